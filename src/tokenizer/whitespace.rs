use nom::{character::complete::multispace1, error::context};

use super::token::ParserResult;

/// Consumes spaces, tabs and line breaks. The tokenizer drops the match but
/// still advances its line and column counters over it.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<&str> {
    context("whitespace", multispace1)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() {
        let (rest, consumed) = parse_whitespace(" \t\n x").unwrap();
        assert_eq!(consumed, " \t\n ");
        assert_eq!(rest, "x");
        assert!(parse_whitespace("x").is_err());
    }
}
