use super::core::ParseError;
use super::core::ParseResult;
use super::core::Parser;
use std::marker::PhantomData;

// Succeeds when `f` maps the next element to a value.
#[derive(Clone)]
pub struct Satisfy<I, O, F> {
    f: F,
    _phantom: PhantomData<(I, O)>,
}

impl<I, O, F> Satisfy<I, O, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, F> Parser<I, O> for Satisfy<I, O, F>
where
    F: Fn(&I) -> Option<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        match input.get(pos) {
            Some(x) => (self.f)(x)
                .map(|result| (pos + 1, result))
                .ok_or(ParseError::Unexpected { position: pos }),
            None => Err(ParseError::EOF),
        }
    }
}

pub struct Choice<I, O> {
    parsers: Vec<Box<dyn Parser<I, O>>>,
}

impl<I, O> Choice<I, O> {
    pub fn new(parsers: Vec<Box<dyn Parser<I, O>>>) -> Self {
        Self { parsers }
    }
}

impl<I, O> Parser<I, O> for Choice<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        for parser in &self.parsers {
            match parser.parse(input, pos) {
                Ok(result) => return Ok(result),
                Err(e) if e.is_failure() => return Err(e),
                Err(_) => continue,
            }
        }
        Err(ParseError::NoAlternative { position: pos })
    }
}

#[derive(Clone)]
pub struct Preceded<P1, P2, I, O> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O)>,
}

impl<P1, P2, I, O> Preceded<P1, P2, I, O> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O> Parser<I, O> for Preceded<P1, P2, I, O>
where
    P1: Parser<I, ()>,
    P2: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (pos, _) = self.parser1.parse(input, pos)?;
        let (pos, result) = self.parser2.parse(input, pos)?;
        Ok((pos, result))
    }
}

#[derive(Clone)]
pub struct Map<P, F, A, B> {
    parser: P,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, A, B> Map<P, F, A, B> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, A, B, P, F> Parser<I, B> for Map<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<B> {
        self.parser
            .parse(input, pos)
            .map(|(pos, value)| (pos, (self.f)(value)))
    }
}

#[derive(Clone)]
pub struct AsUnit<P, O> {
    parser: P,
    _phantom: PhantomData<O>,
}

impl<P, O> AsUnit<P, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, P, O> Parser<I, ()> for AsUnit<P, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<()> {
        self.parser.parse(input, pos).map(|(pos, _)| (pos, ()))
    }
}

#[derive(Clone)]
pub struct Many<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Many<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, Vec<O>> for Many<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        let mut results = Vec::new();
        let mut current_pos = pos;

        loop {
            match self.parser.parse(input, current_pos) {
                // stop when the parser makes no progress
                Ok((new_pos, _)) if new_pos == current_pos => break,
                Ok((new_pos, value)) => {
                    results.push(value);
                    current_pos = new_pos;
                }
                Err(e) if e.is_failure() => return Err(e),
                Err(_) => break,
            }
        }

        Ok((current_pos, results))
    }
}

pub struct SeparatedList<P, S, I, O> {
    item_parser: P,
    separator_parser: S,
    _phantom: PhantomData<(I, O)>,
}

impl<P, S, I, O> SeparatedList<P, S, I, O> {
    pub fn new(item_parser: P, separator_parser: S) -> Self {
        Self {
            item_parser,
            separator_parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P, S> Parser<I, Vec<O>> for SeparatedList<P, S, I, O>
where
    P: Parser<I, O>,
    S: Parser<I, ()>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Vec<O>> {
        let mut results = Vec::new();
        let mut current_pos = pos;

        // an empty list when the first item fails
        match self.item_parser.parse(input, current_pos) {
            Ok((new_pos, value)) => {
                results.push(value);
                current_pos = new_pos;
            }
            Err(e) if e.is_failure() => return Err(e),
            Err(_) => return Ok((current_pos, results)),
        }

        while let Ok((sep_pos, _)) = self.separator_parser.parse(input, current_pos) {
            match self.item_parser.parse(input, sep_pos) {
                Ok((new_pos, value)) => {
                    results.push(value);
                    current_pos = new_pos;
                }
                Err(e) if e.is_failure() => return Err(e),
                // a trailing separator is left unconsumed
                Err(_) => break,
            }
        }

        Ok((current_pos, results))
    }
}

#[derive(Clone)]
pub struct Optional<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Optional<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, Option<O>> for Optional<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Option<O>> {
        match self.parser.parse(input, pos) {
            Ok((new_pos, value)) => Ok((new_pos, Some(value))),
            Err(e) if e.is_failure() => Err(e),
            Err(_) => Ok((pos, None)),
        }
    }
}

#[derive(Clone)]
pub struct Tuple2<P1, P2, I, O1, O2> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<(I, O1, O2)>,
}

impl<P1, P2, I, O1, O2> Tuple2<P1, P2, I, O1, O2> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, I, O1, O2> Parser<I, (O1, O2)> for Tuple2<P1, P2, I, O1, O2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2)> {
        let (pos, result1) = self.parser1.parse(input, pos)?;
        let (pos, result2) = self.parser2.parse(input, pos)?;
        Ok((pos, (result1, result2)))
    }
}

#[derive(Clone)]
pub struct Tuple3<P1, P2, P3, I, O1, O2, O3> {
    parser1: P1,
    parser2: P2,
    parser3: P3,
    _phantom: PhantomData<(I, O1, O2, O3)>,
}

impl<P1, P2, P3, I, O1, O2, O3> Tuple3<P1, P2, P3, I, O1, O2, O3> {
    pub fn new(parser1: P1, parser2: P2, parser3: P3) -> Self {
        Self {
            parser1,
            parser2,
            parser3,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, I, O1, O2, O3> Parser<I, (O1, O2, O3)> for Tuple3<P1, P2, P3, I, O1, O2, O3>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2, O3)> {
        let (pos, result1) = self.parser1.parse(input, pos)?;
        let (pos, result2) = self.parser2.parse(input, pos)?;
        let (pos, result3) = self.parser3.parse(input, pos)?;
        Ok((pos, (result1, result2, result3)))
    }
}

// Turns errors into committed failures.
#[derive(Clone)]
pub struct Cut<P, O> {
    parser: P,
    expected: String,
    _phantom: PhantomData<O>,
}

impl<P, O> Cut<P, O> {
    pub fn new(parser: P, expected: &str) -> Self {
        Self {
            parser,
            expected: expected.to_string(),
            _phantom: PhantomData,
        }
    }
}

impl<I, O, P> Parser<I, O> for Cut<P, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser.parse(input, pos).map_err(|e| {
            if e.is_failure() {
                e
            } else {
                ParseError::Failure {
                    expected: self.expected.clone(),
                    position: pos,
                }
            }
        })
    }
}

#[derive(Clone)]
pub struct WithContext<P, C> {
    parser: P,
    context: C,
}

impl<P, C> WithContext<P, C> {
    pub fn new(parser: P, context: C) -> Self {
        Self { parser, context }
    }
}

impl<I, O, P, C: ToString> Parser<I, O> for WithContext<P, C>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser
            .parse(input, pos)
            .map_err(|e| ParseError::WithContext {
                message: self.context.to_string(),
                inner: Box::new(e),
            })
    }
}

#[derive(Clone)]
pub struct Lazy<F> {
    f: F,
}

impl<F> Lazy<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<I, O, F, P> Parser<I, O> for Lazy<F>
where
    F: Fn() -> P,
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        (self.f)().parse(input, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit() -> Satisfy<char, u32, impl Fn(&char) -> Option<u32>> {
        Satisfy::new(|c: &char| c.to_digit(10))
    }

    fn plus() -> AsUnit<Satisfy<char, char, impl Fn(&char) -> Option<char>>, char> {
        AsUnit::new(Satisfy::new(|c: &char| (*c == '+').then_some('+')))
    }

    #[test]
    fn test_satisfy() {
        let input = vec!['1', 'a'];
        assert_eq!(digit().parse(&input, 0), Ok((1, 1)));
        assert_eq!(
            digit().parse(&input, 1),
            Err(ParseError::Unexpected { position: 1 })
        );
        assert_eq!(digit().parse(&input, 2), Err(ParseError::EOF));
    }

    #[test]
    fn test_many_and_separated_list() {
        let input = vec!['1', '2', '3', 'x'];
        assert_eq!(Many::new(digit()).parse(&input, 0), Ok((3, vec![1, 2, 3])));

        let input = vec!['1', '+', '2', '+'];
        let list = SeparatedList::new(digit(), plus());
        // the trailing separator is left unconsumed
        assert_eq!(list.parse(&input, 0), Ok((3, vec![1, 2])));
    }

    #[test]
    fn test_cut_stops_choice() {
        let input = vec!['+', 'a'];
        let committed = Preceded::new(plus(), Cut::new(digit(), "digit"));
        let choice: Choice<char, u32> = Choice::new(vec![
            Box::new(committed),
            Box::new(Map::new(Satisfy::new(|c: &char| Some(*c)), |_: char| 0u32)),
        ]);
        assert_eq!(
            choice.parse(&input, 0),
            Err(ParseError::Failure {
                expected: "digit".to_string(),
                position: 1,
            })
        );
    }

    #[test]
    fn test_optional_and_context() {
        let input = vec!['a'];
        assert_eq!(Optional::new(digit()).parse(&input, 0), Ok((0, None)));

        let err = WithContext::new(Cut::new(digit(), "digit"), "number")
            .parse(&input, 0)
            .unwrap_err();
        assert_eq!(err.failure(), Some(("digit", 0)));
        assert_eq!(err.contexts(), vec!["number"]);
    }

    #[test]
    fn test_tuples() {
        let input = vec!['1', '2', '3'];
        assert_eq!(
            Tuple3::new(digit(), digit(), digit()).parse(&input, 0),
            Ok((3, (1, 2, 3)))
        );
        assert_eq!(
            Tuple2::new(digit(), Lazy::new(digit)).parse(&input, 1),
            Ok((3, (2, 3)))
        );
    }
}
