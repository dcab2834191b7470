//! Latitude and longitude coercion, plus bounding-box completeness

use super::scalar::parse_float;
use super::{format_number, Coercer, FieldInput, FilterValue, FormValue};
use crate::error::CoerceError;
use crate::schema::Kind;
use mo_common::ErrorKind;

/// A single coordinate bounded to `[-limit, limit]`
pub struct CoordinateCoercer {
    kind: Kind,
    limit: f64,
}

impl CoordinateCoercer {
    pub const LATITUDE: CoordinateCoercer = CoordinateCoercer {
        kind: Kind::Latitude,
        limit: 90.0,
    };

    pub const LONGITUDE: CoordinateCoercer = CoordinateCoercer {
        kind: Kind::Longitude,
        limit: 180.0,
    };
}

impl Coercer for CoordinateCoercer {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let Some(value) = input.single_primary()? else {
            return Ok(None);
        };
        let degrees = parse_float(value).ok_or_else(|| CoerceError::invalid_value(value))?;
        if !(-self.limit..=self.limit).contains(&degrees) {
            return Err(CoerceError::out_of_range(value));
        }
        Ok(Some(FilterValue::Float(degrees)))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        match value {
            FilterValue::Float(f) => FormValue::primary(format_number(*f)),
            _ => FormValue::default(),
        }
    }
}

/// Edge fields of a geographic bounding box
pub const BOX_EDGES: [&str; 4] = ["north", "south", "east", "west"];

/// Field key that bounding-box errors are reported against
pub const BOX_FIELD: &str = "in_box";

/// Check that a bounding box is either fully given or not given at all
///
/// `present` says whether each of [`BOX_EDGES`] was submitted. On failure
/// the error args name the missing edges.
pub fn check_bounding_box(present: impl Fn(&str) -> bool) -> Result<(), CoerceError> {
    let missing: Vec<String> = BOX_EDGES
        .iter()
        .filter(|&&edge| !present(edge))
        .map(|edge| edge.to_string())
        .collect();

    if missing.is_empty() || missing.len() == BOX_EDGES.len() {
        return Ok(());
    }
    Err(CoerceError {
        kind: ErrorKind::IncompleteBoundingBox,
        args: missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(coercer: &CoordinateCoercer, value: &str) -> Result<Option<FilterValue>, CoerceError> {
        coercer.parse(&FieldInput::new(&[value], &[]))
    }

    #[test]
    fn test_latitude_bounds() {
        assert_eq!(
            parse(&CoordinateCoercer::LATITUDE, "-90"),
            Ok(Some(FilterValue::Float(-90.0)))
        );
        let err = parse(&CoordinateCoercer::LATITUDE, "90.5").unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
    }

    #[test]
    fn test_longitude_bounds() {
        assert_eq!(
            parse(&CoordinateCoercer::LONGITUDE, "-122.4"),
            Ok(Some(FilterValue::Float(-122.4)))
        );
        assert!(parse(&CoordinateCoercer::LONGITUDE, "180").is_ok());
        let err = parse(&CoordinateCoercer::LONGITUDE, "181").unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
    }

    #[test]
    fn test_non_numeric_is_invalid_value() {
        let err = parse(&CoordinateCoercer::LATITUDE, "north-ish").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
    }

    #[test]
    fn test_bounding_box_counts() {
        assert!(check_bounding_box(|_| false).is_ok());
        assert!(check_bounding_box(|_| true).is_ok());

        let err = check_bounding_box(|edge| edge == "north").unwrap_err();
        assert_eq!(err.kind, ErrorKind::IncompleteBoundingBox);
        assert_eq!(err.args, vec!["south", "east", "west"]);

        let err = check_bounding_box(|edge| edge != "west").unwrap_err();
        assert_eq!(err.args, vec!["west"]);
    }
}
