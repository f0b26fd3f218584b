//! Pollutant quality-index classifier.
//!
//! Maps a concentration to a severity band 1..=6. Index 0 means the reading
//! could not be classified: unknown pollutant, a unit other than µg/m³, or a
//! value at or below zero.

/// Canonical concentration unit (micrograms per cubic meter).
pub const CANONICAL_UNIT: &str = "µg/m³";

/// Same unit spelled with GREEK SMALL LETTER MU instead of MICRO SIGN.
const CANONICAL_UNIT_MU: &str = "μg/m³";

/// Highest index a reading can get.
pub const MAX_QUALITY_INDEX: u8 = 6;

/// Pollutants with a band table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pollutant {
    O3,
    Pm10,
    Pm25,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub fn from_parameter(parameter: &str) -> Option<Self> {
        match parameter {
            "o3" => Some(Pollutant::O3),
            "pm10" => Some(Pollutant::Pm10),
            "pm25" => Some(Pollutant::Pm25),
            "no2" => Some(Pollutant::No2),
            "so2" => Some(Pollutant::So2),
            "co" => Some(Pollutant::Co),
            _ => None,
        }
    }

    /// Upper bounds (inclusive) of bands 1..=5. Anything above the last one is band 6.
    fn band_ceilings(self) -> [i64; 5] {
        match self {
            Pollutant::O3 => [60, 90, 130, 180, 240],
            Pollutant::Pm10 => [20, 35, 50, 100, 150],
            Pollutant::Pm25 => [10, 20, 30, 60, 90],
            Pollutant::No2 => [45, 100, 140, 200, 400],
            Pollutant::So2 => [50, 85, 120, 200, 500],
            Pollutant::Co => [2500, 3500, 5000, 10500, 20500],
        }
    }

    /// Band of a positive concentration in µg/m³.
    pub fn band(self, value: i64) -> u8 {
        if value <= 0 {
            return 0;
        }
        let ceilings = self.band_ceilings();
        ceilings
            .iter()
            .position(|&hi| value <= hi)
            .map(|idx| idx as u8 + 1)
            .unwrap_or(MAX_QUALITY_INDEX)
    }
}

pub fn is_canonical_unit(unit: &str) -> bool {
    unit == CANONICAL_UNIT || unit == CANONICAL_UNIT_MU
}

/// Quality index of one reading. Total and pure: always returns 0..=6.
pub fn classify(parameter: &str, value: i64, unit: &str) -> u8 {
    if !is_canonical_unit(unit) {
        return 0;
    }
    match Pollutant::from_parameter(parameter) {
        Some(pollutant) => pollutant.band(value),
        None => 0,
    }
}
