use serde::{Deserialize, Serialize};

/// Brazilian postal code (CEP) as received from the caller.
///
/// Only the length is checked: exactly 8 bytes. Anything beyond that
/// (digits only, hyphen handling) is left to the upstream lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipCode(String);

impl ZipCode {
    pub const LEN: usize = 8;

    /// Returns `None` when the raw value is absent or not exactly 8 bytes long.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.is_empty() || raw.len() != Self::LEN {
            return None;
        }
        Some(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZipCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current temperature in the three units returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    #[serde(rename = "temp_C")]
    pub celsius: f64,
    #[serde(rename = "temp_K")]
    pub kelvin: f64,
    #[serde(rename = "temp_F")]
    pub fahrenheit: f64,
}

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            kelvin: celsius + 273.15,
            fahrenheit: celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_code_requires_exactly_eight_chars() {
        assert!(ZipCode::parse(None).is_none());
        assert!(ZipCode::parse(Some("")).is_none());
        assert!(ZipCode::parse(Some("0131010")).is_none());
        assert!(ZipCode::parse(Some("013101000")).is_none());

        let zip = ZipCode::parse(Some("01310100")).expect("valid length");
        assert_eq!(zip.as_str(), "01310100");
    }

    #[test]
    fn zip_code_does_not_check_digits() {
        assert!(ZipCode::parse(Some("abcdefgh")).is_some());
        assert!(ZipCode::parse(Some("01310-10")).is_some());
    }

    #[test]
    fn zip_code_counts_bytes_not_characters() {
        // 8 chars, 16 bytes
        assert!(ZipCode::parse(Some("ãããããããã")).is_none());
        // 4 chars, 8 bytes
        assert!(ZipCode::parse(Some("ãããã")).is_some());
    }

    #[test]
    fn conversions_match_formulas() {
        for c in [0.0_f64, 100.0, -40.0, 36.6] {
            let t = Temperature::from_celsius(c);
            assert_eq!(t.celsius, c);
            assert_eq!(t.kelvin, c + 273.15);
            assert_eq!(t.fahrenheit, c * 9.0 / 5.0 + 32.0);
        }
    }

    #[test]
    fn well_known_points() {
        assert_eq!(Temperature::from_celsius(0.0).fahrenheit, 32.0);
        assert_eq!(Temperature::from_celsius(100.0).fahrenheit, 212.0);
        assert_eq!(Temperature::from_celsius(-40.0).fahrenheit, -40.0);
        assert_eq!(Temperature::from_celsius(0.0).kelvin, 273.15);
    }

    #[test]
    fn serializes_with_unit_suffixed_keys() {
        let json = serde_json::to_string(&Temperature::from_celsius(25.0)).unwrap();
        assert_eq!(json, r#"{"temp_C":25.0,"temp_K":298.15,"temp_F":77.0}"#);
    }
}
