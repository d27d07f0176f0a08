//! Evaluation of parsed media queries against feature values.

use super::{MediaExpression, MediaQuery, MediaType, Modifier};
use crate::feature::{FeatureKind, MediaFeature};
use crate::value::{MediaValue, MediaValues};
use cssparser::{ParseError, Parser, ParserInput, Token};

const PX_PER_IN: f64 = 96.0;
const CM_PER_IN: f64 = 2.54;
const ROOT_FONT_SIZE_PX: f64 = 16.0;

/// Numeric form of a feature value
#[derive(Debug, Clone, PartialEq)]
enum Numeric {
    Number(f64),
    Dimension(f64, String),
    Ratio(f64, f64),
}

pub(super) fn query_matches(query: &MediaQuery, values: &MediaValues) -> bool {
    let matched = type_matches(&query.media_type, values)
        && query
            .expressions
            .iter()
            .all(|expression| expression_matches(expression, values));
    matched != query.inverse
}

fn type_matches(media_type: &MediaType, values: &MediaValues) -> bool {
    if media_type.is_all() {
        return true;
    }
    values
        .get(&MediaFeature::Type)
        .is_some_and(|actual| actual.to_css().eq_ignore_ascii_case(media_type.name()))
}

fn expression_matches(expression: &MediaExpression, values: &MediaValues) -> bool {
    let Some(actual) = values.get(&expression.feature) else {
        return false;
    };

    let Some(expected) = expression.value.as_deref() else {
        return boolean_context(expression.feature.kind(), actual);
    };

    match expression.feature.kind() {
        FeatureKind::Length => compare_numeric(expression.modifier, actual, expected, to_px),
        FeatureKind::Resolution => compare_numeric(expression.modifier, actual, expected, to_dpi),
        FeatureKind::Ratio => compare_numeric(expression.modifier, actual, expected, to_decimal),
        FeatureKind::Integer => {
            let expected = to_integer(expected).unwrap_or(1.0);
            let actual = to_integer(&actual.to_css()).unwrap_or(0.0);
            compare(expression.modifier, actual, expected)
        }
        FeatureKind::Discrete => match expression.modifier {
            Modifier::Exact => actual.to_css().trim().eq_ignore_ascii_case(expected),
            // Unknown features may still carry lengths
            Modifier::Min | Modifier::Max => {
                compare_numeric(expression.modifier, actual, expected, to_px)
            }
        },
    }
}

/// `(feature)` without a value: true unless the feature is zero or `none`
fn boolean_context(kind: FeatureKind, actual: &MediaValue) -> bool {
    let text = actual.to_css();
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("none") {
        return false;
    }
    match kind {
        FeatureKind::Discrete => true,
        _ => parse_numeric(text).map_or(true, |numeric| match numeric {
            Numeric::Number(n) | Numeric::Dimension(n, _) => n != 0.0,
            Numeric::Ratio(num, _) => num != 0.0,
        }),
    }
}

fn compare_numeric(
    modifier: Modifier,
    actual: &MediaValue,
    expected: &str,
    convert: fn(&Numeric) -> Option<f64>,
) -> bool {
    let actual = match actual {
        MediaValue::Number(n) => Some(Numeric::Number(*n)),
        MediaValue::Text(text) => parse_numeric(text),
    };
    let actual = actual.as_ref().and_then(convert);
    let expected = parse_numeric(expected).as_ref().and_then(convert);
    match (actual, expected) {
        (Some(actual), Some(expected)) => compare(modifier, actual, expected),
        _ => false,
    }
}

fn compare(modifier: Modifier, actual: f64, expected: f64) -> bool {
    match modifier {
        Modifier::Min => actual >= expected,
        Modifier::Max => actual <= expected,
        // Tokenized values are f32, numbers passed in directly are f64
        Modifier::Exact => {
            (actual - expected).abs() <= 1e-6 * actual.abs().max(expected.abs()).max(1.0)
        }
    }
}

fn to_px(numeric: &Numeric) -> Option<f64> {
    match numeric {
        Numeric::Number(n) => Some(*n),
        Numeric::Dimension(n, unit) => {
            let factor = match unit.as_str() {
                "px" => 1.0,
                "em" | "rem" => ROOT_FONT_SIZE_PX,
                "in" => PX_PER_IN,
                "cm" => PX_PER_IN / CM_PER_IN,
                "mm" => PX_PER_IN / CM_PER_IN / 10.0,
                "q" => PX_PER_IN / CM_PER_IN / 40.0,
                "pt" => PX_PER_IN / 72.0,
                "pc" => PX_PER_IN / 6.0,
                _ => return None,
            };
            Some(n * factor)
        }
        Numeric::Ratio(..) => None,
    }
}

fn to_dpi(numeric: &Numeric) -> Option<f64> {
    match numeric {
        Numeric::Number(n) => Some(*n),
        Numeric::Dimension(n, unit) => match unit.as_str() {
            "dpi" => Some(*n),
            "dpcm" => Some(n * CM_PER_IN),
            "dppx" | "x" => Some(n * PX_PER_IN),
            _ => None,
        },
        Numeric::Ratio(..) => None,
    }
}

fn to_decimal(numeric: &Numeric) -> Option<f64> {
    match numeric {
        Numeric::Number(n) => Some(*n),
        Numeric::Ratio(_, denominator) if *denominator == 0.0 => None,
        Numeric::Ratio(numerator, denominator) => Some(numerator / denominator),
        Numeric::Dimension(..) => None,
    }
}

fn to_integer(text: &str) -> Option<f64> {
    match parse_numeric(text)? {
        Numeric::Number(n) | Numeric::Dimension(n, _) => Some(n.trunc()),
        Numeric::Ratio(..) => None,
    }
}

/// Read `800px`, `2`, `16/9` or `16 / 9` with the CSS tokenizer
fn parse_numeric(text: &str) -> Option<Numeric> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parser.parse_entirely(parse_numeric_token).ok()
}

fn parse_numeric_token<'i>(input: &mut Parser<'i, '_>) -> Result<Numeric, ParseError<'i, ()>> {
    let numeric = match input.next()?.clone() {
        Token::Number { value, .. } => {
            let numerator = f64::from(value);
            if input.try_parse(|p| p.expect_delim('/')).is_ok() {
                Numeric::Ratio(numerator, f64::from(input.expect_number()?))
            } else {
                Numeric::Number(numerator)
            }
        }
        Token::Dimension { value, unit, .. } => {
            Numeric::Dimension(f64::from(value), unit.to_ascii_lowercase())
        }
        token => return Err(input.new_unexpected_token_error(token)),
    };
    Ok(numeric)
}
