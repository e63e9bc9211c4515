use crate::classify::error::{ClassificationError, IncompleteCause};
use crate::classify::month_windows::month_windows;
use crate::types::enso::{CalendarMonth, ClassificationResult, Intensity, Phenomenon, SeasonalRow};
use std::iter::FusedIterator;

/// Maps a three-window anomaly mean to an ENSO phase and intensity.
///
/// Returns `None` for NaN or infinite means; [`classify_month`] reports those as
/// `DataIncomplete` rather than neutral.
///
/// | mean                  | result              |
/// |-----------------------|---------------------|
/// | `>= 1.5`              | El Niño, Strong     |
/// | `[1.0, 1.5)`          | El Niño, Moderate   |
/// | `(0.5, 1.0)`          | El Niño, Weak       |
/// | `[-0.5, 0.5]`         | Neutral             |
/// | `(-1.0, -0.5)`        | La Niña, Weak       |
/// | `(-1.5, -1.0]`        | La Niña, Moderate   |
/// | `<= -1.5`             | La Niña, Strong     |
///
/// # Examples
///
/// ```
/// use agroclima::{classify_anomaly, Intensity, Phenomenon};
///
/// assert_eq!(classify_anomaly(0.5), Some((Phenomenon::Neutral, Intensity::Neutral)));
/// assert_eq!(classify_anomaly(1.0), Some((Phenomenon::ElNino, Intensity::Moderate)));
/// assert_eq!(classify_anomaly(-1.5), Some((Phenomenon::LaNina, Intensity::Strong)));
/// assert_eq!(classify_anomaly(f64::NAN), None);
/// ```
pub fn classify_anomaly(mean: f64) -> Option<(Phenomenon, Intensity)> {
    if !mean.is_finite() {
        return None;
    }
    let label = if mean >= 1.5 {
        (Phenomenon::ElNino, Intensity::Strong)
    } else if mean >= 1.0 {
        (Phenomenon::ElNino, Intensity::Moderate)
    } else if mean > 0.5 {
        (Phenomenon::ElNino, Intensity::Weak)
    } else if mean <= -1.5 {
        (Phenomenon::LaNina, Intensity::Strong)
    } else if mean <= -1.0 {
        (Phenomenon::LaNina, Intensity::Moderate)
    } else if mean < -0.5 {
        (Phenomenon::LaNina, Intensity::Weak)
    } else {
        (Phenomenon::Neutral, Intensity::Neutral)
    };
    Some(label)
}

/// Mean anomaly of the three windows associated with `month`.
pub fn month_mean(row: &SeasonalRow, month: CalendarMonth) -> Result<f64, ClassificationError> {
    let mut sum = 0.0;
    for window in month_windows(month) {
        sum += row
            .get(window)
            .ok_or(ClassificationError::DataIncomplete {
                year: row.year,
                month,
                cause: IncompleteCause::MissingWindow(window),
            })?;
    }
    Ok(sum / 3.0)
}

/// Classifies one (row, month) pair.
pub fn classify_month(
    row: &SeasonalRow,
    month: CalendarMonth,
) -> Result<ClassificationResult, ClassificationError> {
    let mean = month_mean(row, month)?;
    let (phenomenon, intensity) =
        classify_anomaly(mean).ok_or(ClassificationError::DataIncomplete {
            year: row.year,
            month,
            cause: IncompleteCause::NonFinite,
        })?;
    Ok(ClassificationResult {
        year: row.year,
        month,
        phenomenon,
        intensity,
    })
}

/// Lazily classifies every month of every row.
///
/// Yields exactly `12 * rows.len()` items, months in calendar order within each row,
/// rows in input order. A failed pair yields an `Err` and iteration continues.
/// Clone the iterator (or call `classify` again) to restart it.
///
/// # Examples
///
/// ```
/// use agroclima::{classify, CalendarMonth, Intensity, Phenomenon, SeasonalRow, WindowCode};
///
/// let row = SeasonalRow::new(2015)
///     .with_window(WindowCode::NDJ, 1.2)
///     .with_window(WindowCode::DJF, 1.8)
///     .with_window(WindowCode::JFM, 1.9);
/// let rows = [row];
///
/// let january = classify(&rows).next().unwrap().unwrap();
/// assert_eq!(january.month, CalendarMonth::January);
/// assert_eq!(january.phenomenon, Phenomenon::ElNino);
/// assert_eq!(january.intensity, Intensity::Strong);
///
/// // February needs FMA, which this row lacks
/// assert!(classify(&rows).nth(1).unwrap().is_err());
/// ```
pub fn classify(rows: &[SeasonalRow]) -> Classifications<'_> {
    Classifications {
        rows,
        position: 0,
    }
}

/// Iterator returned by [`classify`].
#[derive(Debug, Clone)]
pub struct Classifications<'a> {
    rows: &'a [SeasonalRow],
    // index over (row, month) pairs
    position: usize,
}

impl Iterator for Classifications<'_> {
    type Item = Result<ClassificationResult, ClassificationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.get(self.position / 12)?;
        let month = CalendarMonth::ALL[self.position % 12];
        self.position += 1;
        Some(classify_month(row, month))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.rows.len() * 12).saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Classifications<'_> {}

impl FusedIterator for Classifications<'_> {}
