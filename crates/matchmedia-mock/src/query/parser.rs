//! Media query list parser built on the `cssparser` tokenizer.
//!
//! Grammar:
//!
//! ```text
//! list       := query ( ',' query )*
//! query      := [ 'not' | 'only' ] <type> ( 'and' expression )*
//!             | [ 'not' ] expression ( 'and' expression )*
//! expression := '(' <feature> [ ':' <value> ] ')'
//! ```

use super::{MediaExpression, MediaQuery, MediaType, Modifier};
use crate::feature::MediaFeature;
use crate::result::{MediaError, MediaResult};
use cssparser::{ParseError, Parser, ParserInput};

type QueryParseError<'i> = ParseError<'i, ()>;

/// Parse a media query list into its comma separated alternatives.
///
/// An empty (or whitespace-only) list is equivalent to `all`.
pub fn parse_media_query_list(media: &str) -> MediaResult<Vec<MediaQuery>> {
    if media.trim().is_empty() {
        return Ok(vec![MediaQuery::all()]);
    }

    let mut input = ParserInput::new(media);
    let mut parser = Parser::new(&mut input);
    parser
        .parse_entirely(|list| list.parse_comma_separated(parse_media_query))
        .map_err(|err| {
            MediaError::invalid_query(
                media,
                format!(
                    "{:?} at line {}, column {}",
                    err.kind, err.location.line, err.location.column
                ),
            )
        })
}

fn parse_media_query<'i>(input: &mut Parser<'i, '_>) -> Result<MediaQuery, QueryParseError<'i>> {
    let mut query = MediaQuery::default();

    let only = if input.try_parse(|p| p.expect_ident_matching("not")).is_ok() {
        query.inverse = true;
        false
    } else {
        input.try_parse(|p| p.expect_ident_matching("only")).is_ok()
    };

    let media_type = input.try_parse(|p| p.expect_ident().map(|ident| ident.to_string()));
    match media_type {
        Ok(name) => query.media_type = MediaType::from_name(&name),
        // `only` must be followed by a media type
        Err(err) if only => return Err(err.into()),
        Err(_) => query.expressions.push(parse_expression(input)?),
    }

    while input.try_parse(|p| p.expect_ident_matching("and")).is_ok() {
        query.expressions.push(parse_expression(input)?);
    }

    Ok(query)
}

fn parse_expression<'i>(input: &mut Parser<'i, '_>) -> Result<MediaExpression, QueryParseError<'i>> {
    input.expect_parenthesis_block()?;
    input.parse_nested_block(|block| {
        let location = block.current_source_location();
        let name = block.expect_ident()?.to_ascii_lowercase();
        let (modifier, feature_name) = split_modifier(&name);

        let value = if block.is_exhausted() {
            None
        } else {
            block.expect_colon()?;
            let start = block.position();
            while block.next().is_ok() {}
            let raw = block.slice_from(start).trim();
            if raw.is_empty() {
                return Err(block.new_custom_error(()));
            }
            Some(raw.to_string())
        };

        // `min-`/`max-` only make sense with a value to compare against
        if modifier != Modifier::Exact && value.is_none() {
            return Err(location.new_custom_error(()));
        }

        Ok(MediaExpression {
            modifier,
            feature: MediaFeature::from_name(feature_name),
            value,
        })
    })
}

fn split_modifier(name: &str) -> (Modifier, &str) {
    if let Some(rest) = name.strip_prefix("min-") {
        (Modifier::Min, rest)
    } else if let Some(rest) = name.strip_prefix("max-") {
        (Modifier::Max, rest)
    } else {
        (Modifier::Exact, name)
    }
}
