//! Temperature unit rule: convert to Fahrenheit before comparing against
//! `TEMP_MAX`, matching the unit string case-insensitively.

/// Convert `value` to Fahrenheit given its unit string. Celsius units
/// convert; Fahrenheit units pass through; an unrecognized unit logs a
/// warning and is assumed to already be Fahrenheit.
pub fn to_fahrenheit(value: f64, unit: &str) -> f64 {
    let lower = unit.to_lowercase();
    if lower.contains("celsius") || lower == "c" {
        value * 9.0 / 5.0 + 32.0
    } else if lower.contains("fahrenheit") || lower == "f" {
        value
    } else {
        tracing::warn!(unit, "unrecognized temperature unit, assuming Fahrenheit");
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_unit_converts() {
        assert!((to_fahrenheit(37.0, "celsius") - 98.6).abs() < 1e-9);
        assert!((to_fahrenheit(0.0, "C") - 32.0).abs() < 1e-9);
    }

    #[test]
    fn fahrenheit_unit_passes_through() {
        assert_eq!(to_fahrenheit(98.6, "fahrenheit"), 98.6);
        assert_eq!(to_fahrenheit(98.6, "F"), 98.6);
    }

    #[test]
    fn unknown_unit_is_assumed_fahrenheit() {
        assert_eq!(to_fahrenheit(100.0, "kelvin"), 100.0);
    }
}
