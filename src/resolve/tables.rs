//! Static lookup tables used when a station name does not match the registry directly.

use std::collections::HashMap;

/// Known-irregular INMET station names and the municipality they belong to.
///
/// Keys are station names exactly as the SISDAGRO station list publishes them.
const INMET_STATION_ALIASES: &[(&str, &str)] = &[
    ("ABROLHOS (A) - BA", "Caravelas"),
    ("AGUAS EMENDADAS (A) - GO", "Planaltina"),
    ("ALTO DA BOA VISTA (C) - RJ", "Rio de Janeiro"),
    ("ARCO VERDE (A) - PE", "Recife"),
    ("AREMBEPE (A) - BA", "Camaçari"),
    ("AVELAR (P.DO ALFERES) (C) - RJ", "Paty do Alferes"),
    ("BOM JESUS DO PIAUI (C) - PI", "Bom Jesus"),
    ("BOM JESUS DO PIAUI (A) - PI", "Bom Jesus"),
    ("CALCANHAR (A) - RN", "Touros"),
    ("CALDEIRAO (C) - PI", "Picos"),
    ("CAMARATUBA (A) - PB", "Mamanguape"),
    ("CAMPO NOVO DOS PARECIS (A) - MT", "Campo Novo do Parecis"),
    ("CAMPOS (C) - RJ", "Campos dos Goytacazes"),
    ("CAMPOS (A) - RJ", "Campos dos Goytacazes"),
    ("C. DO MATO DENTRO (C) - MG", "Conceição do Mato Dentro"),
    ("CEARA MIRIM (C) - RN", "Ceará-Mirim"),
    ("DELFINO (A) - BA", "Vitória da Conquista"),
    ("ECOLOGIA AGRÍCOLA (A) - RJ", "Seropédica"),
    ("FACULDADE DA TERRA DE BRASÍLIA (A) - DF", "Brasília"),
    ("FLORIANÓPOLIS-SÃO JOSE (A) - SC", "São José"),
    ("FORTE DE COPACABANA (A) - RJ", "Rio de Janeiro"),
    ("GLEBA CELESTE (C) - MT", "Sorriso"),
    ("IAUARETÊ (C) - AM", "São Gabriel da Cachoeira"),
    ("ILHA DE SANTANA (A) - MA", "São Luís"),
    ("ILHA DO MEL (A) - PR", "Paranaguá"),
    ("JACAREPAGUA (A) - RJ", "Rio de Janeiro"),
    ("LUIZ EDUARDO MAGALHAES (A) - BA", "Luís Eduardo Magalhães"),
    ("Mal. CANDIDO RONDON (A) - PR", "Marechal Cândido Rondon"),
    ("MARIA DE FÉ (A) - MG", "Maria da Fé"),
    ("MOCAMBINHO (C) - MG", "Pirapora"),
    ("MOCAMBINHO (A) - MG", "Pirapora"),
    ("MOELA (A) - SP", "Itapira"),
    ("MONTE VERDE (A) - MG", "Camanducaia"),
    ("MORRO DOS CAVALOS (C) - PI", "São João da Serra"),
    ("NHUMIRIM (A) - MS", "Corumbá"),
    ("NHUMIRIM (NHECOLANDIA) (C) - MS", "Corumbá"),
    ("NOVA XAV.(XAVANTINA) (C) - MT", "Nova Xavantina"),
    ("PADRE RICARDO REMETTER (C) - MT", "Campo Verde"),
    ("PALMEIRA DA MISSÕES (A) - RS", "Palmeira das Missões"),
    ("PARATÍ (A) - RJ", "Paraty"),
    ("PARQUE ESTADUAL CHANDLESS (A) - AC", "Manoel Urbano"),
    ("PICO DO COUTO (A) - RJ", "Petrópolis"),
    ("POXOREO (C) - MT", "Poxoréu"),
    ("PREGUIÇAS (A) - MA", "Barreirinhas"),
    ("PRES. KENNEDY (A) - ES", "Presidente Kennedy"),
    ("REALENGO (C) - RJ", "Rio de Janeiro"),
    ("RIO DE JANEIRO-MARAMBAIA (A) - RJ", "Rio de Janeiro"),
    ("RIO URUBU (A) - AM", "Itacoatiara"),
    ("SANTA MARTA (A) - SC", "Laguna"),
    ("SANTANA DO LIVRAMENTO (C) - RS", "Santana do Livramento"),
    ("SANTANA DO LIVRAMENTO (A) - RS", "Santana do Livramento"),
    ("SÃO FELIX DO ARAGUAIA (A) - MT", "São Félix do Araguaia"),
    ("SÃO LUIS DO PARAITINGA (A) - SP", "São Luiz do Paraitinga"),
    ("SAO PAULO - MIRANTE (A) - SP", "São Paulo"),
    ("SAO S.DO PARAISO (C) - MG", "São Sebastião do Paraíso"),
    ("SERIDO (CAICO) (C) - RN", "Caicó"),
    ("SERRA DOS CARAJÁS (A) - PA", "Parauapebas"),
    ("S.G.DA CACHOEIRA(UAUPES) (C) - AM", "São Gabriel da Cachoeira"),
    ("S.J. DO RIO CLARO (A) - MT", "São José do Rio Claro"),
    ("STa. R. DE CASSIA (IBIPETUBA) (C) - BA", "Santa Rita de Cássia"),
    ("TARTARUGUALZINHO (A) - AP", "Tartarugalzinho"),
    ("TOMÉ AÇU (A) - PA", "Tomé-Açu"),
    ("TRÊS MARIA (A) - MG", "Três Marias"),
    ("USINA JUNQUEIRA (C) - SP", "Cravinhos"),
    ("VALE DO GURGUEIA (CRISTIANO CASTRO) (C) - PI", "Cristino Castro"),
    ("VILA MILITAR (A) - RJ", "Rio de Janeiro"),
    ("XEREM (A) - RJ", "Duque de Caxias"),
];

/// Municipalities missing from, or spelled differently in, the registry snapshot.
const INMET_OVERRIDE_IDS: &[(&str, u32)] = &[
    ("Santana do Livramento", 430016),
    ("São Félix do Araguaia", 5107859),
    ("São Luiz do Paraitinga", 3550001),
];

/// Alias and override tables injected into an [`crate::EntityResolver`].
///
/// Both tables are keyed verbatim: no normalization is applied to their keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverTables {
    aliases: HashMap<String, String>,
    overrides: HashMap<String, u32>,
}

impl ResolverTables {
    /// Empty tables: only exact registry matches resolve.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The tables curated for the INMET station feeds.
    pub fn inmet() -> Self {
        Self::new(
            INMET_STATION_ALIASES
                .iter()
                .map(|(raw, canonical)| (raw.to_string(), canonical.to_string())),
            INMET_OVERRIDE_IDS
                .iter()
                .map(|(name, id)| (name.to_string(), *id)),
        )
    }

    pub fn new(
        aliases: impl IntoIterator<Item = (String, String)>,
        overrides: impl IntoIterator<Item = (String, u32)>,
    ) -> Self {
        Self {
            aliases: aliases.into_iter().collect(),
            overrides: overrides.into_iter().collect(),
        }
    }

    pub fn with_alias(mut self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(raw.into(), canonical.into());
        self
    }

    pub fn with_override(mut self, canonical: impl Into<String>, id: u32) -> Self {
        self.overrides.insert(canonical.into(), id);
        self
    }

    pub fn alias(&self, raw: &str) -> Option<&str> {
        self.aliases.get(raw).map(String::as_str)
    }

    pub fn override_id(&self, canonical: &str) -> Option<u32> {
        self.overrides.get(canonical).copied()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inmet_tables_loaded() {
        let tables = ResolverTables::inmet();
        assert_eq!(tables.aliases.len(), INMET_STATION_ALIASES.len());
        assert_eq!(tables.alias("XEREM (A) - RJ"), Some("Duque de Caxias"));
        assert_eq!(tables.alias("xerem (a) - rj"), None);
        assert_eq!(tables.override_id("Santana do Livramento"), Some(430016));
    }

    #[test]
    fn test_builder_methods() {
        let tables = ResolverTables::empty()
            .with_alias("FOO (A) - XX", "Foo")
            .with_override("Foo", 42);
        assert_eq!(tables.alias("FOO (A) - XX"), Some("Foo"));
        assert_eq!(tables.override_id("Foo"), Some(42));
        assert_eq!(tables.override_id("Bar"), None);
    }
}
