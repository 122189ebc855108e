// SPDX: CC0-1.0

use crate::eval::OperatorTyp;
use core::{fmt, iter::Peekable, str::CharIndices};
use std::sync::Arc;

/// A span of an expression's source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubStr {
    src: Arc<String>,
    start: usize,
    len: usize,
}

impl SubStr {
    #[inline]
    pub const fn new(src: Arc<String>, start: usize, len: usize) -> Self {
        Self { src, start, len }
    }

    #[inline]
    pub fn all(src: Arc<String>) -> Self {
        let len = src.len();
        Self::new(src, 0, len)
    }

    /// Zero-width span just past the end of the source.
    #[inline]
    pub fn end(src: Arc<String>) -> Self {
        let start = src.len();
        Self::new(src, start, 0)
    }

    pub fn src(&self) -> Arc<String> {
        Arc::clone(&self.src)
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self) -> &str {
        &self.src[self.start..self.start + self.len]
    }

    fn grow(&mut self, by: usize) {
        self.len += by;
    }
}

impl fmt::Display for SubStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokTyp {
    Ident,
    Number,
    Op(OperatorTyp),
    Comma,
    OpenParen,
    CloseParen,

    // recognised, but not part of the language
    XGreater,
    XLess,
    XEqual,
    XPipe,
    XOpenSquareBracket,
    XCloseSquareBracket,
    XOpenCurly,
    XCloseCurly,
}

impl TokTyp {
    pub const fn is_unsupported(&self) -> bool {
        match self {
            Self::Ident
            | Self::Number
            | Self::Op(_)
            | Self::Comma
            | Self::OpenParen
            | Self::CloseParen => false,

            Self::XGreater
            | Self::XLess
            | Self::XEqual
            | Self::XPipe
            | Self::XOpenSquareBracket
            | Self::XCloseSquareBracket
            | Self::XOpenCurly
            | Self::XCloseCurly => true,
        }
    }

    /// Whether a `-` following this token negates rather than subtracts.
    const fn expects_operand(prev: Option<Self>) -> bool {
        matches!(
            prev,
            None | Some(Self::Op(_) | Self::Comma | Self::OpenParen)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tok {
    pub typ: TokTyp,
    pub loc: SubStr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrTyp {
    #[error("invalid character")]
    InvalidChar,
    #[error("unsupported character")]
    Unsupported(TokTyp),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{typ}")]
pub struct LexErr {
    pub typ: LexErrTyp,
    pub loc: SubStr,
}

#[derive(Debug)]
pub struct Lexer<'src> {
    src: &'src Arc<String>,
    cur: Peekable<CharIndices<'src>>,
    prev: Option<TokTyp>,
    has_errored: bool, // yield None after the first error
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src Arc<String>) -> Self {
        Self {
            src,
            cur: src.char_indices().peekable(),
            prev: None,
            has_errored: false,
        }
    }

    fn span(&self, start: usize, len: usize) -> SubStr {
        SubStr::new(Arc::clone(self.src), start, len)
    }

    fn skip_whitespace(&mut self) {
        while self
            .cur
            .next_if(|(_, chr)| chr.is_ascii_whitespace())
            .is_some()
        {}
    }

    fn single_char(&self, chr: char) -> Option<TokTyp> {
        let typ = match chr {
            '+' => TokTyp::Op(OperatorTyp::Add),
            '*' => TokTyp::Op(OperatorTyp::Mul),
            '/' => TokTyp::Op(OperatorTyp::Div),
            '^' => TokTyp::Op(OperatorTyp::Pow),
            '-' if TokTyp::expects_operand(self.prev) => TokTyp::Op(OperatorTyp::Neg),
            '-' => TokTyp::Op(OperatorTyp::Sub),
            ',' => TokTyp::Comma,
            '(' => TokTyp::OpenParen,
            ')' => TokTyp::CloseParen,

            '>' => TokTyp::XGreater,
            '<' => TokTyp::XLess,
            '=' => TokTyp::XEqual,
            '|' => TokTyp::XPipe,
            '[' => TokTyp::XOpenSquareBracket,
            ']' => TokTyp::XCloseSquareBracket,
            '{' => TokTyp::XOpenCurly,
            '}' => TokTyp::XCloseCurly,
            _ => return None,
        };
        Some(typ)
    }

    /// Consumes the longest run of characters matching `predicate`.
    fn consume_run<P>(&mut self, start: usize, typ: TokTyp, predicate: P) -> Option<Tok>
    where
        P: Fn(char) -> bool,
    {
        let mut loc = self.span(start, 0);
        while let Some((_, chr)) = self.cur.next_if(|&(_, chr)| predicate(chr)) {
            loc.grow(chr.len_utf8());
        }
        (!loc.is_empty()).then_some(Tok { typ, loc })
    }

    fn fail(&mut self, typ: LexErrTyp, start: usize, chr: char) -> LexErr {
        self.has_errored = true;
        LexErr {
            typ,
            loc: self.span(start, chr.len_utf8()),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Tok, LexErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_errored {
            return None;
        }

        self.skip_whitespace();
        let (start, chr) = self.cur.peek().copied()?;

        let tok = if let Some(typ) = self.single_char(chr) {
            self.cur.next();
            if typ.is_unsupported() {
                return Some(Err(self.fail(LexErrTyp::Unsupported(typ), start, chr)));
            }
            Tok {
                typ,
                loc: self.span(start, 1),
            }
        } else if let Some(tok) =
            self.consume_run(start, TokTyp::Ident, |chr| chr.is_ascii_alphabetic())
        {
            tok
        } else if let Some(tok) = self.consume_run(start, TokTyp::Number, |chr| {
            chr.is_ascii_digit() || chr == '.'
        }) {
            tok
        } else {
            return Some(Err(self.fail(LexErrTyp::InvalidChar, start, chr)));
        };

        self.prev = Some(tok.typ);
        Some(Ok(tok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Result<Tok, LexErr>> {
        let src = Arc::new(src.to_string());
        Lexer::new(&src).collect()
    }

    fn types(src: &str) -> Vec<TokTyp> {
        lex(src)
            .into_iter()
            .map(|tok| tok.expect("lexes").typ)
            .collect()
    }

    #[test]
    fn minus_after_operand_subtracts() {
        assert_eq!(
            types("x-1"),
            [
                TokTyp::Ident,
                TokTyp::Op(OperatorTyp::Sub),
                TokTyp::Number
            ]
        );
        assert_eq!(
            types("(x) - 1"),
            [
                TokTyp::OpenParen,
                TokTyp::Ident,
                TokTyp::CloseParen,
                TokTyp::Op(OperatorTyp::Sub),
                TokTyp::Number
            ]
        );
    }

    #[test]
    fn minus_in_operand_position_negates() {
        assert_eq!(
            types("-x"),
            [TokTyp::Op(OperatorTyp::Neg), TokTyp::Ident]
        );
        assert_eq!(
            types("log(x, -1)"),
            [
                TokTyp::Ident,
                TokTyp::OpenParen,
                TokTyp::Ident,
                TokTyp::Comma,
                TokTyp::Op(OperatorTyp::Neg),
                TokTyp::Number,
                TokTyp::CloseParen
            ]
        );
        assert_eq!(
            types("2 * -x"),
            [
                TokTyp::Number,
                TokTyp::Op(OperatorTyp::Mul),
                TokTyp::Op(OperatorTyp::Neg),
                TokTyp::Ident
            ]
        );
    }

    #[test]
    fn spans_cover_whole_tokens() {
        let toks = lex("  sin(3.25)");
        let locs: Vec<(usize, &str)> = toks
            .iter()
            .map(|tok| {
                let tok = tok.as_ref().expect("lexes");
                (tok.loc.start(), tok.loc.get())
            })
            .collect();
        assert_eq!(locs, [(2, "sin"), (5, "("), (6, "3.25"), (10, ")")]);
    }

    #[test]
    fn unsupported_token_stops_lexing() {
        let toks = lex("x = 2");
        assert_eq!(toks.len(), 2);
        let err = toks[1].clone().unwrap_err();
        assert_eq!(err.typ, LexErrTyp::Unsupported(TokTyp::XEqual));
        assert_eq!(err.loc.start(), 2);
    }

    #[test]
    fn non_ascii_is_invalid() {
        let toks = lex("x + é");
        let err = toks.last().cloned().expect("a token").unwrap_err();
        assert_eq!(err.typ, LexErrTyp::InvalidChar);
        assert_eq!(err.loc.get(), "é");
    }
}
