//! Name normalization shared by both sides of every registry comparison.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds a municipality or station name for comparison.
///
/// Lowercases, then decomposes (NFD) and drops the combining marks, so
/// `"São Paulo"`, `"SAO PAULO"` and `"sao paulo"` all fold to `"sao paulo"`.
/// Punctuation and whitespace are kept as-is.
///
/// # Examples
///
/// ```
/// use agroclima::normalize_name;
///
/// assert_eq!(normalize_name("São Paulo"), normalize_name("Sao Paulo"));
/// assert_eq!(normalize_name("CEARÁ-MIRIM"), "ceara-mirim");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Python-style title casing: the first letter of every alphabetic run is uppercased
/// and the rest lowercased. INMET feeds publish names in upper case.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_is_letter = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_portuguese_diacritics() {
        assert_eq!(normalize_name("Camaçari"), "camacari");
        assert_eq!(normalize_name("Tomé-Açu"), "tome-acu");
        assert_eq!(normalize_name("São Gabriel da Cachoeira"), "sao gabriel da cachoeira");
        assert_eq!(normalize_name("Poxoréu"), "poxoreu");
        assert_eq!(normalize_name("Luís Eduardo Magalhães"), "luis eduardo magalhaes");
    }

    #[test]
    fn test_keeps_punctuation() {
        assert_eq!(normalize_name("Sant'Ana do Livramento"), "sant'ana do livramento");
        assert_eq!(normalize_name("Pres. Kennedy"), "pres. kennedy");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("SANTANA DO LIVRAMENTO"), "Santana Do Livramento");
        assert_eq!(title_case("SÃO JOAQUIM"), "São Joaquim");
        assert_eq!(title_case("SANT'ANA"), "Sant'Ana");
        assert_eq!(title_case(""), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(name in "[A-Za-zÀ-ÖØ-Þà-öø-ÿ '().-]{0,40}") {
            let once = normalize_name(&name);
            prop_assert_eq!(normalize_name(&once), once);
        }

        #[test]
        fn normalize_ignores_case(name in "[A-Za-zÀ-ÖØ-Þà-öø-ÿ ]{0,40}") {
            prop_assert_eq!(normalize_name(&name.to_uppercase()), normalize_name(&name));
        }
    }
}
