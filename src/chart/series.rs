//! Series model, colors and the built-in sample data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ChartError;

/// A named run of `(index, value)` pairs drawn as one line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self { name: name.into(), points }
    }

    /// Build a series from plain values, indexed from 0
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect();
        Self::new(name, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|&(_, y)| y)
            .fold(None, |acc, y| Some(acc.map_or(y, |m: f64| m.max(y))))
    }
}

/// Parse a JSON list of series
pub fn series_from_json(json: &str) -> Result<Vec<Series>, ChartError> {
    serde_json::from_str(json).map_err(|e| ChartError::Parse(e.to_string()))
}

/// The two demonstration series, 13 points each
pub fn sample_series() -> Vec<Series> {
    vec![
        Series::from_values(
            "a",
            &[3.0, 1.0, 3.0, 5.0, 9.0, 4.0, 2.0, 3.0, 6.0, 8.0, 10.0, 5.0, 3.0],
        ),
        Series::from_values(
            "b",
            &[4.0, 3.0, 8.0, 5.0, 5.0, 10.0, 7.0, 5.0, 1.0, 2.0, 8.0, 11.0, 7.0],
        ),
    ]
}

/// 8-bit RGB color; parsed from `#rrggbb` or `rgb(r, g, b)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChartError::InvalidColor(s.to_string());
        let t = s.trim();

        if let Some(hex) = t.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let inner = t
            .strip_prefix("rgb(")
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let channels: Vec<u8> = inner
            .split(',')
            .map(|c| c.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<_, _>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb(*r, *g, *b)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ChartError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_series_shape() {
        let series = sample_series();
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|s| s.len() == 13));
        assert_eq!(series[0].points[4], (4.0, 9.0));
        assert_eq!(series[1].max_value(), Some(11.0));
    }

    #[test]
    fn test_max_value_empty() {
        assert_eq!(Series::new("empty", vec![]).max_value(), None);
    }

    #[test]
    fn test_series_from_json() {
        let json = r#"[{"name":"x","points":[[0,1],[1,2.5]]}]"#;
        let series = series_from_json(json).unwrap();
        assert_eq!(series[0].points, vec![(0.0, 1.0), (1.0, 2.5)]);

        assert!(matches!(series_from_json("{"), Err(ChartError::Parse(_))));
    }

    #[test]
    fn test_rgb_parse_and_display() {
        assert_eq!("#0000ff".parse::<Rgb>().unwrap(), Rgb::BLUE);
        assert_eq!("rgb(255, 0, 0)".parse::<Rgb>().unwrap(), Rgb::RED);
        assert_eq!(Rgb(9, 160, 255).to_string(), "#09a0ff");
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("rgb(1,2)".parse::<Rgb>().is_err());
        assert!("blue".parse::<Rgb>().is_err());
    }
}
