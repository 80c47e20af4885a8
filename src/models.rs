//! Data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CatalogError;

/// Diameter reported for comets whose stored diameter is zero, in kilometers.
///
/// A stored zero means the diameter was never measured. Consumers such as
/// visualizations scale objects by diameter, so they get a nominal minimum
/// instead.
pub const DIAMETER_PLACEHOLDER_KM: f64 = 0.5;

/// Calendar year used to select close approaches and perihelion passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationYear(i32);

impl TryFrom<i32> for ObservationYear {
    type Error = CatalogError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if !(1..=9999).contains(&value) {
            return Err(CatalogError::InvalidYear(value));
        }
        Ok(Self(value))
    }
}

impl ObservationYear {
    /// Get the raw year value
    pub fn value(&self) -> i32 {
        self.0
    }

    /// First day of the year, inclusive lower bound.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following year, exclusive upper bound.
    pub fn end_exclusive(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0 + 1, 1, 1).unwrap_or(NaiveDate::MAX)
    }

    /// `LIKE` pattern matching any text containing the year.
    pub fn like_pattern(&self) -> String {
        format!("%{}%", self.as_text())
    }

    /// Text form of the year as it appears in calendar strings.
    pub fn as_text(&self) -> String {
        format!("{:04}", self.0)
    }

    /// Whether a human-readable calendar date mentions this year.
    ///
    /// Catalog dates come in many layouts (`2024-May-01.25`, `20240421.1429`,
    /// `21 Apr 2024`), so this is the same containment test as the
    /// [`like_pattern`](Self::like_pattern) filter.
    pub fn matches_calendar_text(&self, text: &str) -> bool {
        text.contains(&self.as_text())
    }
}

/// Coerce loosely typed text to a number.
///
/// Reads the longest numeric prefix after leading whitespace, so `"3.2"`,
/// `"3.2 km"` and `" 1e3"` all yield numbers. Text without a numeric prefix
/// yields 0.0, as do values that overflow to infinity.
pub fn coerce_numeric_text(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Replace the unmeasured-diameter sentinel with [`DIAMETER_PLACEHOLDER_KM`].
///
/// Exact comparison: the sentinel is a stored zero, never a computed value.
pub fn normalize_diameter(diameter: f64) -> f64 {
    if diameter == 0.0 {
        DIAMETER_PLACEHOLDER_KM
    } else {
        diameter
    }
}

/// Asteroid row, passed through column for column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AsteroidRecord(pub Map<String, Value>);

impl AsteroidRecord {
    /// Calendar date of the close approach, when present as text.
    pub fn tp_cal(&self) -> Option<&str> {
        self.0.get("tp_cal").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for AsteroidRecord {
    fn from(columns: Map<String, Value>) -> Self {
        Self(columns)
    }
}

/// Comet with its orbital elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CometRecord {
    pub name: String,
    /// Diameter in kilometers, never zero once normalized
    pub diameter: f64,
    pub eccentricity: f64,
    /// Inclination in degrees
    pub inclination: f64,
    /// Perihelion distance
    pub perihelion: f64,
    /// Total absolute magnitude
    #[serde(rename = "M1")]
    pub m1: f64,
    /// Aphelion distance
    #[serde(rename = "Q")]
    pub aphelion: f64,
    /// Mean daily motion
    pub n: f64,
    /// Time of perihelion passage, calendar text
    pub tp_cal: String,
}

impl CometRecord {
    /// Apply output normalization: unmeasured diameters get the placeholder.
    pub fn normalized(mut self) -> Self {
        self.diameter = normalize_diameter(self.diameter);
        self
    }
}

/// Body of the comet listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CometsResponse {
    pub comets: Vec<CometRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn year_bounds() {
        let year = ObservationYear::try_from(2024).unwrap();
        assert_eq!(year.first_day(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(
            year.end_exclusive(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(year.like_pattern(), "%2024%");
    }

    #[test]
    fn year_out_of_range() {
        assert!(ObservationYear::try_from(0).is_err());
        assert!(ObservationYear::try_from(10_000).is_err());
        assert!(ObservationYear::try_from(9999).is_ok());
    }

    #[test]
    fn calendar_text_matching() {
        let year = ObservationYear::try_from(2024).unwrap();
        assert!(year.matches_calendar_text("2024-05-01"));
        assert!(year.matches_calendar_text("2024-May-01.2531"));
        assert!(year.matches_calendar_text("2024/12/31 23:59"));
        assert!(year.matches_calendar_text("20240421.1429"));
        assert!(year.matches_calendar_text("21 Apr 2024"));
        assert!(year.matches_calendar_text("04/21/2024"));
        assert!(year.matches_calendar_text("1998-2024"));
        assert!(!year.matches_calendar_text("2023-05-01"));
        assert!(!year.matches_calendar_text("May 2025"));
        assert!(!year.matches_calendar_text(""));
    }

    #[test]
    fn early_year_is_zero_padded() {
        let year = ObservationYear::try_from(812).unwrap();
        assert_eq!(year.as_text(), "0812");
        assert_eq!(year.like_pattern(), "%0812%");
        assert!(year.matches_calendar_text("0812-01-01"));
    }

    #[test]
    fn numeric_text_coercion() {
        assert_eq!(coerce_numeric_text("3.2"), 3.2);
        assert_eq!(coerce_numeric_text("  -2"), -2.0);
        assert_eq!(coerce_numeric_text(".5"), 0.5);
        assert_eq!(coerce_numeric_text("7."), 7.0);
        assert_eq!(coerce_numeric_text("1e3km"), 1000.0);
        assert_eq!(coerce_numeric_text("1.5e"), 1.5);
        assert_eq!(coerce_numeric_text("4.25 km"), 4.25);
        assert_eq!(coerce_numeric_text("abc"), 0.0);
        assert_eq!(coerce_numeric_text(""), 0.0);
        assert_eq!(coerce_numeric_text("."), 0.0);
        assert_eq!(coerce_numeric_text("-"), 0.0);
        assert_eq!(coerce_numeric_text("1e999"), 0.0);
    }

    #[test]
    fn diameter_placeholder() {
        assert_eq!(normalize_diameter(0.0), DIAMETER_PLACEHOLDER_KM);
        assert_eq!(normalize_diameter(-0.0), DIAMETER_PLACEHOLDER_KM);
        assert_eq!(normalize_diameter(3.2), 3.2);
        assert_eq!(normalize_diameter(1e-12), 1e-12);
    }

    #[test]
    fn comet_serializes_catalog_field_names() {
        let comet = CometRecord {
            name: "C/Test".to_string(),
            diameter: 0.0,
            eccentricity: 0.99,
            inclination: 12.5,
            perihelion: 0.8,
            m1: 11.0,
            aphelion: 250.0,
            n: 0.001,
            tp_cal: "2024-05-01".to_string(),
        }
        .normalized();

        let value = serde_json::to_value(&comet).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "C/Test",
                "diameter": 0.5,
                "eccentricity": 0.99,
                "inclination": 12.5,
                "perihelion": 0.8,
                "M1": 11.0,
                "Q": 250.0,
                "n": 0.001,
                "tp_cal": "2024-05-01"
            })
        );
    }

    #[test]
    fn asteroid_is_transparent() {
        let mut columns = Map::new();
        columns.insert("name".to_string(), json!("2024 AB"));
        columns.insert("tp_cal".to_string(), json!("2024-03-14"));
        let asteroid = AsteroidRecord::from(columns);

        assert_eq!(asteroid.tp_cal(), Some("2024-03-14"));
        assert_eq!(
            serde_json::to_string(&asteroid).unwrap(),
            r#"{"name":"2024 AB","tp_cal":"2024-03-14"}"#
        );
    }
}
