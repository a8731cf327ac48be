// ============================================================================
// NUMERIC PARAMETERS: prompt descriptions and text parsing
// ============================================================================

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Float,
}

/// One numeric prompt: what to ask, and the value offered by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamField {
    pub key: &'static str,
    pub prompt: &'static str,
    pub default: &'static str,
    pub kind: ParamKind,
}

impl ParamField {
    pub const fn int(key: &'static str, prompt: &'static str, default: &'static str) -> Self {
        Self { key, prompt, default, kind: ParamKind::Int }
    }

    pub const fn float(key: &'static str, prompt: &'static str, default: &'static str) -> Self {
        Self { key, prompt, default, kind: ParamKind::Float }
    }

    /// Parse user text according to the field kind.
    pub fn parse(&self, text: &str) -> Result<f64> {
        match self.kind {
            ParamKind::Int => parse_int(self.key, text).map(|v| v as f64),
            ParamKind::Float => parse_float(self.key, text),
        }
    }
}

/// Whole number, surrounding whitespace ignored.
pub fn parse_int(name: &'static str, text: &str) -> Result<i64> {
    let t = text.trim();
    t.parse::<i64>()
        .map_err(|_| Error::invalid(name, format!("'{t}' is not a whole number")))
}

/// Finite decimal number, surrounding whitespace ignored.
pub fn parse_float(name: &'static str, text: &str) -> Result<f64> {
    let t = text.trim();
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::invalid(name, format!("'{t}' is not a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_numbers() {
        assert_eq!(parse_int("dx", " 30 ").unwrap(), 30);
        assert_eq!(parse_int("dx", "-4").unwrap(), -4);
        assert_eq!(parse_float("sigma", "2.5").unwrap(), 2.5);
        assert_eq!(parse_float("sigma", "3").unwrap(), 3.0);
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = parse_int("dx", "thirty").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "dx", .. }));
        assert!(parse_int("dx", "1.5").is_err());
        assert!(parse_float("amplitude", "").is_err());
        assert!(parse_float("amplitude", "inf").is_err());
        assert!(parse_float("amplitude", "NaN").is_err());
    }

    #[test]
    fn field_parses_by_kind() {
        let dx = ParamField::int("dx", "Shift X", "30");
        assert_eq!(dx.parse(dx.default).unwrap(), 30.0);
        assert!(dx.parse("2.5").is_err());
        let zoom = ParamField::float("factor", "Zoom", "1.5");
        assert_eq!(zoom.parse(zoom.default).unwrap(), 1.5);
    }
}
