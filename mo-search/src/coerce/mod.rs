//! Typed field coercers
//!
//! Each [`Kind`] has exactly one [`Coercer`]. `parse` turns a field's
//! primary (and companion) raw values into a typed [`FilterValue`];
//! `format` renders a value back into form strings so an active filter can
//! be shown in the search form again.

mod date;
mod geo;
mod list;
mod range;
mod scalar;

pub use date::DateBound;
pub use geo::{check_bounding_box, BOX_EDGES, BOX_FIELD};
pub use list::split_list;
pub use range::{Rank, MAX_CONFIDENCE};

use crate::error::CoerceError;
use crate::schema::{FieldSpec, Kind};
use mo_common::ErrorKind;
use serde::Serialize;

/// A range with either end optionally open
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span<T> {
    pub start: Option<T>,
    pub end: Option<T>,
}

impl<T> Span<T> {
    pub fn new(start: Option<T>, end: Option<T>) -> Self {
        Self { start, end }
    }

    pub fn exact(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            start: Some(value.clone()),
            end: Some(value),
        }
    }
}

/// A validated, query-ready field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Dates(Span<DateBound>),
    Ranks(Span<Rank>),
    /// Vote scale, -3.0 to 3.0
    Confidence(Span<f64>),
    Ids(Vec<u64>),
    Strings(Vec<String>),
}

/// Raw input for one field, blank values already removed
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldInput<'a> {
    pub primary: &'a [&'a str],
    pub companion: &'a [&'a str],
}

impl<'a> FieldInput<'a> {
    pub fn new(primary: &'a [&'a str], companion: &'a [&'a str]) -> Self {
        Self { primary, companion }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.companion.is_empty()
    }

    /// The single primary value of a scalar field
    pub(crate) fn single_primary(&self) -> Result<Option<&'a str>, CoerceError> {
        match self.primary {
            [] => Ok(None),
            [one] => Ok(Some(*one)),
            many => Err(CoerceError::too_many_values(many.len())),
        }
    }
}

/// Form strings for one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValue {
    pub primary: Option<String>,
    pub companion: Option<String>,
}

impl FormValue {
    pub fn primary(value: impl Into<String>) -> Self {
        Self {
            primary: Some(value.into()),
            companion: None,
        }
    }
}

pub trait Coercer: Send + Sync {
    fn kind(&self) -> Kind;

    /// `Ok(None)` when the input carries nothing to filter on
    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError>;

    /// Values of another kind's shape render as an empty form value
    fn format(&self, value: &FilterValue) -> FormValue;
}

static COERCERS: [&dyn Coercer; 12] = [
    &scalar::StringCoercer,
    &scalar::BooleanCoercer { yes_only: false },
    &scalar::IntegerCoercer,
    &scalar::FloatCoercer,
    &date::DateCoercer(Kind::Date),
    &date::DateCoercer(Kind::DateRange),
    &range::RankRangeCoercer,
    &range::ConfidenceRangeCoercer,
    &geo::CoordinateCoercer::LONGITUDE,
    &geo::CoordinateCoercer::LATITUDE,
    &list::ListCoercer(Kind::ListOfIds),
    &list::ListCoercer(Kind::ListOfStrings),
];

static YES_ONLY: scalar::BooleanCoercer = scalar::BooleanCoercer { yes_only: true };

/// The coercer for `kind`
pub fn coercer_for(kind: Kind) -> &'static dyn Coercer {
    COERCERS[kind.index()]
}

/// The coercer for one field, honoring its yes-only flag
pub fn field_coercer(spec: &FieldSpec) -> &'static dyn Coercer {
    if spec.yes_only && spec.kind == Kind::Boolean {
        return &YES_ONLY;
    }
    coercer_for(spec.kind)
}

/// Raw shape of a range field's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangeInput<'a> {
    /// One value, no range syntax
    Single(&'a str),
    /// Explicit ends, either possibly open
    Ends(Option<&'a str>, Option<&'a str>),
}

/// Classify range input
///
/// - primary only: single value, or explicit ends with `A..B` syntax
/// - primary + companion: two ends; a primary `A..` takes the companion as
///   its end, a primary that already has an end conflicts with it
/// - companion only: half-open, start unconstrained
/// - two primary values: the two ends
pub(crate) fn range_input<'a>(
    input: &FieldInput<'a>,
) -> Result<Option<RangeInput<'a>>, CoerceError> {
    let companion = match input.companion {
        [] => None,
        [one] => Some(*one),
        many => return Err(CoerceError::too_many_values(many.len())),
    };

    let shape = match (input.primary, companion) {
        ([], None) => return Ok(None),
        ([], Some(end)) => RangeInput::Ends(None, Some(end)),
        ([value], None) => match split_range(value) {
            Some((start, end)) => RangeInput::Ends(start, end),
            None => RangeInput::Single(*value),
        },
        ([value], Some(end)) => match split_range(value) {
            Some((_, Some(_))) => {
                return Err(CoerceError {
                    kind: ErrorKind::InvalidValue,
                    args: vec![value.to_string(), end.to_string()],
                })
            }
            Some((start, None)) => RangeInput::Ends(start, Some(end)),
            None => RangeInput::Ends(Some(*value), Some(end)),
        },
        ([start, end], None) => RangeInput::Ends(Some(*start), Some(*end)),
        (many, companion) => {
            return Err(CoerceError::too_many_values(
                many.len() + usize::from(companion.is_some()),
            ))
        }
    };
    Ok(Some(shape))
}

/// Split `"A..B"` into its ends; `None` when there is no range syntax
pub(crate) fn split_range(value: &str) -> Option<(Option<&str>, Option<&str>)> {
    let (start, end) = value.split_once("..")?;
    let start = start.trim();
    let end = end.trim();
    Some((
        (!start.is_empty()).then_some(start),
        (!end.is_empty()).then_some(end),
    ))
}

/// Render a float without a trailing `.0` for whole numbers
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table_covers_every_kind() {
        for kind in Kind::ALL {
            assert_eq!(coercer_for(kind).kind(), kind);
        }
    }

    #[test]
    fn test_field_coercer_honors_yes_only() {
        let spec = FieldSpec {
            key: "has_comments",
            kind: Kind::Boolean,
            default: None,
            yes_only: true,
        };
        let no = ["no"];
        assert!(field_coercer(&spec).parse(&FieldInput::new(&no, &[])).is_err());

        let spec = FieldSpec { yes_only: false, ..spec };
        assert_eq!(
            field_coercer(&spec).parse(&FieldInput::new(&no, &[])),
            Ok(Some(FilterValue::Boolean(false)))
        );
    }

    #[test]
    fn test_split_range() {
        assert_eq!(split_range("a..b"), Some((Some("a"), Some("b"))));
        assert_eq!(split_range("a.."), Some((Some("a"), None)));
        assert_eq!(split_range(" .. b"), Some((None, Some("b"))));
        assert_eq!(split_range("a-b"), None);
    }

    #[test]
    fn test_range_input_shapes() {
        let one = ["Genus"];
        let two = ["Genus", "Family"];
        let ranged = ["Genus..Order"];
        let end = ["Family"];

        let input = FieldInput::new(&one, &[]);
        assert_eq!(range_input(&input).unwrap(), Some(RangeInput::Single("Genus")));

        let input = FieldInput::new(&one, &end);
        assert_eq!(
            range_input(&input).unwrap(),
            Some(RangeInput::Ends(Some("Genus"), Some("Family")))
        );

        let input = FieldInput::new(&[], &end);
        assert_eq!(
            range_input(&input).unwrap(),
            Some(RangeInput::Ends(None, Some("Family")))
        );

        let input = FieldInput::new(&two, &[]);
        assert_eq!(
            range_input(&input).unwrap(),
            Some(RangeInput::Ends(Some("Genus"), Some("Family")))
        );

        let input = FieldInput::new(&ranged, &[]);
        assert_eq!(
            range_input(&input).unwrap(),
            Some(RangeInput::Ends(Some("Genus"), Some("Order")))
        );

        let input = FieldInput::new(&two, &end);
        assert!(range_input(&input).is_err());

        let open = ["Genus.."];
        let input = FieldInput::new(&open, &end);
        assert_eq!(
            range_input(&input).unwrap(),
            Some(RangeInput::Ends(Some("Genus"), Some("Family")))
        );

        let input = FieldInput::new(&ranged, &end);
        let err = range_input(&input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
        assert_eq!(err.args, vec!["Genus..Order".to_string(), "Family".to_string()]);

        assert_eq!(range_input(&FieldInput::default()).unwrap(), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(-100.0), "-100");
        assert_eq!(format_number(45.25), "45.25");
    }

    #[test]
    fn test_scalar_input_rejects_many_values() {
        let primary = ["1", "2"];
        let input = FieldInput::new(&primary, &[]);
        assert!(input.single_primary().is_err());
    }
}
