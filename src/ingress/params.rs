//! Strict numeric query parameters

use crate::error::IngressError;
use std::collections::HashMap;

/// Parse a numeric parameter. Only finite decimal numbers are accepted.
pub fn parse_number(name: &'static str, raw: &str) -> Result<f64, IngressError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(IngressError::Malformed {
            name,
            value: raw.to_string(),
        }),
    }
}

/// A parameter that must be present and numeric
pub fn required(params: &HashMap<String, String>, name: &'static str) -> Result<f64, IngressError> {
    let raw = params.get(name).ok_or(IngressError::Missing(name))?;
    parse_number(name, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_required_number() {
        let params = query(&[("v", "72.5"), ("b", "-3")]);
        assert_eq!(required(&params, "v"), Ok(72.5));
        assert_eq!(required(&params, "b"), Ok(-3.0));
    }

    #[test]
    fn test_missing_is_not_malformed() {
        let params = query(&[("v", "10")]);
        assert_eq!(required(&params, "b"), Err(IngressError::Missing("b")));
    }

    #[test]
    fn test_malformed_values() {
        for raw in ["", "abc", "12abc", "NaN", "inf", "-infinity", " 5"] {
            let params = query(&[("v", raw)]);
            assert_eq!(
                required(&params, "v"),
                Err(IngressError::Malformed {
                    name: "v",
                    value: raw.to_string()
                }),
                "{:?} accepted",
                raw
            );
        }
    }
}
