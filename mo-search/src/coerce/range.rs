//! Taxonomic rank ranges and confidence ranges

use super::scalar::parse_float;
use super::{format_number, range_input, Coercer, FieldInput, FilterValue, FormValue, RangeInput, Span};
use crate::error::CoerceError;
use crate::schema::Kind;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Taxonomic ranks, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rank {
    Form,
    Variety,
    Subspecies,
    Species,
    Stirps,
    Subsection,
    Section,
    Subgenus,
    Genus,
    Family,
    Order,
    Class,
    Phylum,
    Kingdom,
    Domain,
    Group,
}

impl Rank {
    pub const ALL: [Rank; 16] = [
        Rank::Form,
        Rank::Variety,
        Rank::Subspecies,
        Rank::Species,
        Rank::Stirps,
        Rank::Subsection,
        Rank::Section,
        Rank::Subgenus,
        Rank::Genus,
        Rank::Family,
        Rank::Order,
        Rank::Class,
        Rank::Phylum,
        Rank::Kingdom,
        Rank::Domain,
        Rank::Group,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Form => "Form",
            Rank::Variety => "Variety",
            Rank::Subspecies => "Subspecies",
            Rank::Species => "Species",
            Rank::Stirps => "Stirps",
            Rank::Subsection => "Subsection",
            Rank::Section => "Section",
            Rank::Subgenus => "Subgenus",
            Rank::Genus => "Genus",
            Rank::Family => "Family",
            Rank::Order => "Order",
            Rank::Class => "Class",
            Rank::Phylum => "Phylum",
            Rank::Kingdom => "Kingdom",
            Rank::Domain => "Domain",
            Rank::Group => "Group",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = CoerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        // "Division" is the botanical name for phylum
        if wanted.eq_ignore_ascii_case("division") {
            return Ok(Rank::Phylum);
        }
        Rank::ALL
            .iter()
            .copied()
            .find(|rank| rank.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoerceError::out_of_range(s))
    }
}

fn sorted<T: PartialOrd>(start: Option<T>, end: Option<T>) -> Span<T> {
    match (start, end) {
        (Some(a), Some(b)) if b < a => Span::new(Some(b), Some(a)),
        (start, end) => Span::new(start, end),
    }
}

pub struct RankRangeCoercer;

impl Coercer for RankRangeCoercer {
    fn kind(&self) -> Kind {
        Kind::RankRange
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let span = match range_input(input)? {
            None => return Ok(None),
            Some(RangeInput::Single(value)) => Span::exact(value.parse::<Rank>()?),
            Some(RangeInput::Ends(start, end)) => {
                let start = start.map(str::parse::<Rank>).transpose()?;
                let end = end.map(str::parse::<Rank>).transpose()?;
                sorted(start, end)
            }
        };
        Ok(Some(FilterValue::Ranks(span)))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        let FilterValue::Ranks(span) = value else {
            return FormValue::default();
        };
        match (span.start, span.end) {
            (Some(a), Some(b)) if a == b => FormValue::primary(a.as_str()),
            (start, end) => FormValue {
                primary: start.map(|r| r.as_str().to_string()),
                companion: end.map(|r| r.as_str().to_string()),
            },
        }
    }
}

/// Highest confidence on the vote scale
pub const MAX_CONFIDENCE: f64 = 3.0;

/// Form percentage (-100 to 100) to vote scale (-3 to 3)
fn parse_confidence(value: &str) -> Result<f64, CoerceError> {
    let percent = parse_float(value)
        .filter(|p| (-100.0..=100.0).contains(p))
        .ok_or_else(|| CoerceError::out_of_range(value))?;
    Ok(percent * MAX_CONFIDENCE / 100.0)
}

/// Split `"A-B"` into two percentages; a leading minus belongs to `A`
fn split_confidence_pair(value: &str) -> Option<(&str, &str)> {
    let (at, _) = value.char_indices().skip(1).find(|&(_, c)| c == '-')?;
    let (start, end) = (&value[..at], &value[at + 1..]);
    (!end.is_empty()).then_some((start, end))
}

fn confidence_percent(vote: f64) -> String {
    format_number((vote * 100.0 / MAX_CONFIDENCE * 1000.0).round() / 1000.0)
}

pub struct ConfidenceRangeCoercer;

impl Coercer for ConfidenceRangeCoercer {
    fn kind(&self) -> Kind {
        Kind::ConfidenceRange
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let span = match range_input(input)? {
            None => return Ok(None),
            Some(RangeInput::Single(value)) => match split_confidence_pair(value) {
                Some((start, end)) => sorted(
                    Some(parse_confidence(start)?),
                    Some(parse_confidence(end)?),
                ),
                // A lone value means "at least this confident"
                None => Span::new(Some(parse_confidence(value)?), Some(MAX_CONFIDENCE)),
            },
            Some(RangeInput::Ends(start, end)) => {
                let start = start.map(parse_confidence).transpose()?;
                let end = end.map(parse_confidence).transpose()?;
                sorted(start, end)
            }
        };
        Ok(Some(FilterValue::Confidence(span)))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        let FilterValue::Confidence(span) = value else {
            return FormValue::default();
        };
        match (span.start, span.end) {
            (Some(low), Some(high)) if high == MAX_CONFIDENCE => {
                FormValue::primary(confidence_percent(low))
            }
            (start, end) => FormValue {
                primary: start.map(confidence_percent),
                companion: end.map(confidence_percent),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mo_common::ErrorKind;

    fn ranks(primary: &[&str], companion: &[&str]) -> Result<Span<Rank>, CoerceError> {
        match RankRangeCoercer.parse(&FieldInput::new(primary, companion))? {
            Some(FilterValue::Ranks(span)) => Ok(span),
            other => panic!("unexpected {:?}", other),
        }
    }

    fn confidence(primary: &[&str], companion: &[&str]) -> Result<Span<f64>, CoerceError> {
        match ConfidenceRangeCoercer.parse(&FieldInput::new(primary, companion))? {
            Some(FilterValue::Confidence(span)) => Ok(span),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rank_order() {
        assert!(Rank::Form < Rank::Species);
        assert!(Rank::Genus < Rank::Family);
        assert!(Rank::Domain < Rank::Group);
    }

    #[test]
    fn test_rank_parse_is_case_insensitive_with_division_alias() {
        assert_eq!("genus".parse::<Rank>(), Ok(Rank::Genus));
        assert_eq!("SUBSPECIES".parse::<Rank>(), Ok(Rank::Subspecies));
        assert_eq!("Division".parse::<Rank>(), Ok(Rank::Phylum));
    }

    #[test]
    fn test_single_rank_is_exact() {
        assert_eq!(ranks(&["Genus"], &[]).unwrap(), Span::exact(Rank::Genus));
    }

    #[test]
    fn test_rank_ends_are_sorted() {
        assert_eq!(
            ranks(&["Family"], &["Species"]).unwrap(),
            Span::new(Some(Rank::Species), Some(Rank::Family))
        );
        assert_eq!(
            ranks(&["Order..Genus"], &[]).unwrap(),
            Span::new(Some(Rank::Genus), Some(Rank::Order))
        );
    }

    #[test]
    fn test_rank_half_open() {
        assert_eq!(
            ranks(&[], &["Genus"]).unwrap(),
            Span::new(None, Some(Rank::Genus))
        );
        assert_eq!(
            ranks(&["Species.."], &[]).unwrap(),
            Span::new(Some(Rank::Species), None)
        );
    }

    #[test]
    fn test_unknown_rank_out_of_range() {
        let err = ranks(&["Tribe"], &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
        assert_eq!(err.args, vec!["Tribe".to_string()]);
    }

    #[test]
    fn test_single_confidence_means_at_least() {
        assert_eq!(
            confidence(&["50"], &[]).unwrap(),
            Span::new(Some(1.5), Some(MAX_CONFIDENCE))
        );
    }

    #[test]
    fn test_confidence_ends_sorted_and_scaled() {
        assert_eq!(
            confidence(&["100"], &["-100"]).unwrap(),
            Span::new(Some(-3.0), Some(3.0))
        );
        assert_eq!(
            confidence(&[], &["0"]).unwrap(),
            Span::new(None, Some(0.0))
        );
    }

    #[test]
    fn test_confidence_hyphen_pair() {
        assert_eq!(
            confidence(&["50-100"], &[]).unwrap(),
            Span::new(Some(1.5), Some(3.0))
        );
        assert_eq!(
            confidence(&["-50-100"], &[]).unwrap(),
            Span::new(Some(-1.5), Some(3.0))
        );
        assert_eq!(
            confidence(&["100--100"], &[]).unwrap(),
            Span::new(Some(-3.0), Some(3.0))
        );
        assert_eq!(
            confidence(&["-50"], &[]).unwrap(),
            Span::new(Some(-1.5), Some(MAX_CONFIDENCE))
        );
        assert_eq!(
            confidence(&["50-200"], &[]).unwrap_err().kind,
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_confidence_out_of_domain() {
        for bad in ["101", "-150", "sure", "NaN"] {
            let err = confidence(&[bad], &[]).unwrap_err();
            assert_eq!(err.kind, ErrorKind::OutOfRange, "{}", bad);
        }
    }

    #[test]
    fn test_format_inverts_parse() {
        let value = FilterValue::Confidence(Span::new(Some(1.5), Some(MAX_CONFIDENCE)));
        assert_eq!(ConfidenceRangeCoercer.format(&value), FormValue::primary("50"));

        let value = FilterValue::Ranks(Span::new(Some(Rank::Species), Some(Rank::Genus)));
        assert_eq!(
            RankRangeCoercer.format(&value),
            FormValue {
                primary: Some("Species".to_string()),
                companion: Some("Genus".to_string()),
            }
        );
    }
}
