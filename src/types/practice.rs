use std::fmt;

/// Soil-management practice queried on the SISDAGRO workability service.
///
/// The service identifies practices by the form codes `"1"`, `"2"` and `"3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgriculturalPractice {
    SoilPreparation,
    Sowing,
    Harvest,
}

impl AgriculturalPractice {
    pub const ALL: [AgriculturalPractice; 3] = [
        AgriculturalPractice::SoilPreparation,
        AgriculturalPractice::Sowing,
        AgriculturalPractice::Harvest,
    ];

    pub fn form_code(&self) -> &'static str {
        match self {
            AgriculturalPractice::SoilPreparation => "1",
            AgriculturalPractice::Sowing => "2",
            AgriculturalPractice::Harvest => "3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgriculturalPractice::SoilPreparation => "Preparo do Solo",
            AgriculturalPractice::Sowing => "Semeadura",
            AgriculturalPractice::Harvest => "Colheita",
        }
    }
}

impl fmt::Display for AgriculturalPractice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
