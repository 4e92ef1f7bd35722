use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{cut, map_res, opt, recognize},
    error::context,
    sequence::{pair, preceded},
};

use super::token::{ParserResult, Token};

/// Context label attached when an exponent marker is not followed by digits.
pub const MALFORMED_EXPONENT: &str = "exponent digits";

fn parse_mantissa(input: &str) -> ParserResult<&str> {
    context(
        "mantissa",
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    )(input)
}

// Once `e`/`E` follows a mantissa the exponent is committed.
fn parse_exponent(input: &str) -> ParserResult<&str> {
    preceded(
        one_of("eE"),
        cut(context(
            MALFORMED_EXPONENT,
            recognize(pair(opt(one_of("+-")), digit1)),
        )),
    )(input)
}

/// Parses an unsigned decimal number such as `3`, `3.5`, `.5` or `1.23e-4`.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_number(input: &str) -> ParserResult<Token> {
    context(
        "number",
        map_res(
            recognize(pair(parse_mantissa, opt(parse_exponent))),
            |s: &str| s.parse::<f64>().map(Token::Number),
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_literals() {
        let test_cases = [
            ("42", 42.0),
            ("3.5", 3.5),
            ("3.", 3.0),
            (".5", 0.5),
            ("1.23e-4", 1.23e-4),
            ("2E+3", 2000.0),
        ];
        for (input, expected) in test_cases.iter() {
            let (rest, token) = parse_number(input).unwrap();
            assert_eq!(token, Token::Number(*expected));
            assert_eq!(rest, "");
        }
    }

    #[test]
    fn test_number_stops_before_identifier() {
        let (rest, token) = parse_number("2x").unwrap();
        assert_eq!(token, Token::Number(2.0));
        assert_eq!(rest, "x");
    }

    #[test]
    fn test_missing_exponent_digits_is_failure() {
        assert!(matches!(parse_number("1e+"), Err(nom::Err::Failure(_))));
        assert!(matches!(parse_number("4E"), Err(nom::Err::Failure(_))));
    }

    #[test]
    fn test_not_a_number() {
        assert!(matches!(parse_number("x1"), Err(nom::Err::Error(_))));
        assert!(matches!(parse_number("."), Err(nom::Err::Error(_))));
    }
}
