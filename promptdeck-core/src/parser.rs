use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1, take_while_m_n};
use nom::combinator::{all_consuming, map};
use nom::multi::many0;
use nom::sequence::delimited;
use nom::Err as NomErr;
use nom::IResult;
use nom::Parser;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatPart {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Error)]
pub enum ParseFormatError {
    #[error("invalid format string: {0}")]
    Syntax(String),
    #[error("unknown token name: {0}")]
    UnknownToken(String),
}

/// Parses a format string (`"literal {tokenName} literal"`) into its parts.
/// Every `{` must open a valid placeholder.
pub fn parse_format_string(input: &str) -> Result<Vec<FormatPart>, ParseFormatError> {
    match parse_format(input) {
        Ok((_, parts)) => Ok(parts),
        Err(NomErr::Error(e)) | Err(NomErr::Failure(e)) => Err(ParseFormatError::Syntax(
            format!("failed to parse format string: {:?}", e),
        )),
        Err(NomErr::Incomplete(_)) => {
            Err(ParseFormatError::Syntax("incomplete input".to_string()))
        }
    }
}

pub fn parse_format(input: &str) -> IResult<&str, Vec<FormatPart>> {
    all_consuming(many0(parse_element)).parse(input)
}

pub fn parse_element(input: &str) -> IResult<&str, FormatPart> {
    alt((
        map(parse_placeholder, |name| {
            FormatPart::Placeholder(name.to_string())
        }),
        map(parse_literal_text, |text| {
            FormatPart::Literal(text.to_string())
        }),
    ))
    .parse(input)
}

pub fn parse_placeholder(input: &str) -> IResult<&str, &str> {
    delimited(tag("{"), identifier, tag("}")).parse(input)
}

pub fn parse_literal_text(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '{').parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    // Limit identifiers to 1-64 characters with alphanumeric, dash, underscore
    take_while_m_n(1, 64, |c: char| {
        c.is_alphanumeric() || c == '-' || c == '_'
    })
    .parse(input)
}
