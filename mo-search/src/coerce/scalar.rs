//! Single-valued kinds: string, boolean, integer, float

use super::{format_number, Coercer, FieldInput, FilterValue, FormValue};
use crate::error::CoerceError;
use crate::schema::Kind;

pub struct StringCoercer;

impl Coercer for StringCoercer {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        Ok(input
            .single_primary()?
            .map(|s| FilterValue::String(s.to_string())))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        match value {
            FilterValue::String(s) => FormValue::primary(s.as_str()),
            _ => FormValue::default(),
        }
    }
}

pub struct BooleanCoercer {
    /// Refuse false: the field can only narrow a search, never negate it
    pub yes_only: bool,
}

/// `1|yes|true` and `0|no|false`, case-insensitive
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" => Some(true),
        "0" | "no" | "false" => Some(false),
        _ => None,
    }
}

impl Coercer for BooleanCoercer {
    fn kind(&self) -> Kind {
        Kind::Boolean
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let Some(value) = input.single_primary()? else {
            return Ok(None);
        };
        match parse_bool(value) {
            Some(false) if self.yes_only => Err(CoerceError::invalid_value(value)),
            Some(b) => Ok(Some(FilterValue::Boolean(b))),
            None => Err(CoerceError::invalid_value(value)),
        }
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        match value {
            FilterValue::Boolean(b) => FormValue::primary(b.to_string()),
            _ => FormValue::default(),
        }
    }
}

pub struct IntegerCoercer;

impl Coercer for IntegerCoercer {
    fn kind(&self) -> Kind {
        Kind::Integer
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let Some(value) = input.single_primary()? else {
            return Ok(None);
        };
        value
            .parse::<i64>()
            .map(|n| Some(FilterValue::Integer(n)))
            .map_err(|_| CoerceError::invalid_value(value))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        match value {
            FilterValue::Integer(n) => FormValue::primary(n.to_string()),
            _ => FormValue::default(),
        }
    }
}

pub struct FloatCoercer;

/// Plain decimal: optional minus, digits, optional fraction (`12`, `-1.5`, `.5`)
fn is_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match fraction {
        None => digits(whole),
        Some(fraction) => (whole.is_empty() || digits(whole)) && digits(fraction),
    }
}

/// Finite decimal number; exponents, `+` signs and `inf`/`NaN` are refused
pub(crate) fn parse_float(value: &str) -> Option<f64> {
    if !is_decimal(value) {
        return None;
    }
    value.parse::<f64>().ok().filter(|f| f.is_finite())
}

impl Coercer for FloatCoercer {
    fn kind(&self) -> Kind {
        Kind::Float
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let Some(value) = input.single_primary()? else {
            return Ok(None);
        };
        parse_float(value)
            .map(|f| Some(FilterValue::Float(f)))
            .ok_or_else(|| CoerceError::invalid_value(value))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        match value {
            FilterValue::Float(f) => FormValue::primary(format_number(*f)),
            _ => FormValue::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mo_common::ErrorKind;

    const BOOLEAN: BooleanCoercer = BooleanCoercer { yes_only: false };
    const YES: BooleanCoercer = BooleanCoercer { yes_only: true };

    fn parse(coercer: &dyn Coercer, values: &[&str]) -> Result<Option<FilterValue>, CoerceError> {
        coercer.parse(&FieldInput::new(values, &[]))
    }

    #[test]
    fn test_boolean_spellings() {
        for yes in ["1", "yes", "TRUE", "Yes"] {
            assert_eq!(parse(&BOOLEAN, &[yes]), Ok(Some(FilterValue::Boolean(true))));
        }
        for no in ["0", "no", "False"] {
            assert_eq!(parse(&BOOLEAN, &[no]), Ok(Some(FilterValue::Boolean(false))));
        }
        let err = parse(&BOOLEAN, &["maybe"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
        assert_eq!(err.args, vec!["maybe".to_string()]);
    }

    #[test]
    fn test_yes_only_refuses_false() {
        assert_eq!(parse(&YES, &["yes"]), Ok(Some(FilterValue::Boolean(true))));
        for no in ["no", "false", "0"] {
            let err = parse(&YES, &[no]).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidValue);
            assert_eq!(err.args, vec![no.to_string()]);
        }
    }

    #[test]
    fn test_integer_and_float() {
        assert_eq!(parse(&IntegerCoercer, &["-42"]), Ok(Some(FilterValue::Integer(-42))));
        assert!(parse(&IntegerCoercer, &["4.2"]).is_err());
        assert_eq!(parse(&FloatCoercer, &["4.25"]), Ok(Some(FilterValue::Float(4.25))));
        assert!(parse(&FloatCoercer, &["NaN"]).is_err());
        assert!(parse(&FloatCoercer, &["inf"]).is_err());
    }

    #[test]
    fn test_float_requires_plain_decimal() {
        for good in ["12", "-1.5", ".5", "-.25", "0.0"] {
            assert!(parse_float(good).is_some(), "{}", good);
        }
        for bad in ["1e2", "+45", "1.", "-", ".", "1.2.3", " 4", "0x10"] {
            assert_eq!(parse_float(bad), None, "{}", bad);
        }
        let err = parse(&FloatCoercer, &["1e2"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
    }

    #[test]
    fn test_too_many_values() {
        let err = parse(&StringCoercer, &["a", "b"]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(parse(&StringCoercer, &[]), Ok(None));
        assert_eq!(parse(&BOOLEAN, &[]), Ok(None));
    }

    #[test]
    fn test_format_ignores_other_shapes() {
        assert_eq!(BOOLEAN.format(&FilterValue::Integer(1)), FormValue::default());
        assert_eq!(
            FloatCoercer.format(&FilterValue::Float(2.0)),
            FormValue::primary("2")
        );
    }
}
