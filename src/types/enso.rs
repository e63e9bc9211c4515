//! Types describing the Oceanic Niño Index (ONI) series and its monthly
//! El Niño / La Niña classification.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One of the 12 overlapping three-month seasons used by the ONI table.
///
/// The variants are declared in the column order of the published table, starting
/// with December-January-February.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WindowCode {
    DJF,
    JFM,
    FMA,
    MAM,
    AMJ,
    MJJ,
    JJA,
    JAS,
    ASO,
    SON,
    OND,
    NDJ,
}

impl WindowCode {
    /// All window codes in table column order.
    pub const ALL: [WindowCode; 12] = [
        WindowCode::DJF,
        WindowCode::JFM,
        WindowCode::FMA,
        WindowCode::MAM,
        WindowCode::AMJ,
        WindowCode::MJJ,
        WindowCode::JJA,
        WindowCode::JAS,
        WindowCode::ASO,
        WindowCode::SON,
        WindowCode::OND,
        WindowCode::NDJ,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            WindowCode::DJF => "DJF",
            WindowCode::JFM => "JFM",
            WindowCode::FMA => "FMA",
            WindowCode::MAM => "MAM",
            WindowCode::AMJ => "AMJ",
            WindowCode::MJJ => "MJJ",
            WindowCode::JJA => "JJA",
            WindowCode::JAS => "JAS",
            WindowCode::ASO => "ASO",
            WindowCode::SON => "SON",
            WindowCode::OND => "OND",
            WindowCode::NDJ => "NDJ",
        }
    }
}

impl fmt::Display for WindowCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for WindowCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowCode::ALL
            .into_iter()
            .find(|w| w.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown window code '{}'", s))
    }
}

/// Calendar month, labelled in Portuguese in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CalendarMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl CalendarMonth {
    pub const ALL: [CalendarMonth; 12] = [
        CalendarMonth::January,
        CalendarMonth::February,
        CalendarMonth::March,
        CalendarMonth::April,
        CalendarMonth::May,
        CalendarMonth::June,
        CalendarMonth::July,
        CalendarMonth::August,
        CalendarMonth::September,
        CalendarMonth::October,
        CalendarMonth::November,
        CalendarMonth::December,
    ];

    /// Month number, 1 to 12.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|idx| CalendarMonth::ALL.get(idx as usize).copied())
    }

    pub fn label(&self) -> &'static str {
        match self {
            CalendarMonth::January => "Janeiro",
            CalendarMonth::February => "Fevereiro",
            CalendarMonth::March => "Março",
            CalendarMonth::April => "Abril",
            CalendarMonth::May => "Maio",
            CalendarMonth::June => "Junho",
            CalendarMonth::July => "Julho",
            CalendarMonth::August => "Agosto",
            CalendarMonth::September => "Setembro",
            CalendarMonth::October => "Outubro",
            CalendarMonth::November => "Novembro",
            CalendarMonth::December => "Dezembro",
        }
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One year of the ONI table: the anomaly of each three-month window, in °C.
///
/// A window is absent when the published cell was empty or not numeric (the current
/// year is usually incomplete).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeasonalRow {
    pub year: i32,
    pub windows: HashMap<WindowCode, f64>,
}

impl SeasonalRow {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            windows: HashMap::with_capacity(12),
        }
    }

    /// Builds a complete row from 12 anomalies given in [`WindowCode::ALL`] order.
    pub fn from_values(year: i32, values: [f64; 12]) -> Self {
        Self {
            year,
            windows: WindowCode::ALL.into_iter().zip(values).collect(),
        }
    }

    pub fn with_window(mut self, window: WindowCode, anomaly: f64) -> Self {
        self.windows.insert(window, anomaly);
        self
    }

    pub fn insert(&mut self, window: WindowCode, anomaly: f64) {
        self.windows.insert(window, anomaly);
    }

    pub fn get(&self, window: WindowCode) -> Option<f64> {
        self.windows.get(&window).copied()
    }

    pub fn is_complete(&self) -> bool {
        WindowCode::ALL.iter().all(|w| self.windows.contains_key(w))
    }
}

/// The ENSO phase a monthly anomaly mean falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phenomenon {
    ElNino,
    LaNina,
    Neutral,
}

impl Phenomenon {
    pub fn label(&self) -> &'static str {
        match self {
            Phenomenon::ElNino => "El Niño",
            Phenomenon::LaNina => "La Niña",
            Phenomenon::Neutral => "Neutro",
        }
    }
}

impl fmt::Display for Phenomenon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Strength of an ENSO episode. Neutral months carry [`Intensity::Neutral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intensity {
    Weak,
    Moderate,
    Strong,
    Neutral,
}

impl Intensity {
    pub fn label(&self) -> &'static str {
        match self {
            Intensity::Weak => "Fraco",
            Intensity::Moderate => "Moderado",
            Intensity::Strong => "Forte",
            Intensity::Neutral => "Neutro",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classification of a single (year, month) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub year: i32,
    pub month: CalendarMonth,
    pub phenomenon: Phenomenon,
    pub intensity: Intensity,
}
