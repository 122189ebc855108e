// SPDX: CC0-1.0

//! Validation and point evaluation of user expressions in `x`.

use crate::{
    eval::{self, EvalErr, EvalErrTyp, Idents, Program},
    lex::{LexErrTyp, Lexer, SubStr, TokTyp},
    parse::{self, ParseErr, ParseErrTyp},
    stdlib::{self, X},
    Number,
};
use log::debug;
use std::sync::Arc;

/// Minimum similarity for an identifier to be suggested as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.3;

/// An expression that cannot be plotted at all.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub note: Option<String>,
    pub loc: SubStr,
}

/// Failure to produce a drawable value at a single point.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("result is not a finite number ({0})")]
    NonFinite(Number),
    #[error(transparent)]
    Eval(#[from] EvalErr),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// A validated expression, ready to be evaluated at any `x`.
#[derive(Clone, Debug)]
pub struct Expression {
    src: Arc<String>,
    prog: Program,
    idents: Idents,
}

/// Lexes, parses and statically checks `expr`.
pub fn validate(expr: &str) -> Result<Expression, SyntaxError> {
    let src = Arc::new(expr.to_string());
    let idents = stdlib::standard_idents();

    let prog = parse::parse(Lexer::new(&src), &idents).map_err(SyntaxError::from)?;
    eval::check(&prog, &idents).map_err(|err| SyntaxError::from_check(err, &src, &idents))?;

    Ok(Expression { src, prog, idents })
}

/// Validates `expr` and evaluates it at `x`.
pub fn evaluate_at(expr: &str, x: Number) -> Result<Number, EvalError> {
    validate(expr)?.eval_at(x)
}

impl Expression {
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn program(&self) -> &Program {
        &self.prog
    }

    pub fn eval_at(&self, x: Number) -> Result<Number, EvalError> {
        self.eval_with(x, &mut Vec::new())
    }

    /// Like [`Expression::eval_at`], reusing `stack` between calls.
    pub fn eval_with(&self, x: Number, stack: &mut Vec<Number>) -> Result<Number, EvalError> {
        let y = eval::eval(&self.prog, &self.idents, &[(X, x)], stack)?;
        if y.is_finite() {
            Ok(y)
        } else {
            Err(EvalError::NonFinite(y))
        }
    }
}

impl From<ParseErr> for SyntaxError {
    fn from(err: ParseErr) -> Self {
        let note = match &err.typ {
            ParseErrTyp::LexErr(LexErrTyp::InvalidChar) => Some(
                "available tokens are numbers, alphabetic identifiers, and symbols +-*/^,()",
            ),
            ParseErrTyp::LexErr(LexErrTyp::Unsupported(typ)) => match typ {
                TokTyp::XGreater | TokTyp::XLess => {
                    Some("expected an expression but found an inequality")
                }
                TokTyp::XEqual => Some("expected an expression but found an equation"),
                TokTyp::XPipe => Some("use the 'abs' function to compute absolute value"),
                _ => None,
            },
            ParseErrTyp::ParseNum(_) => Some("numbers are parsed as floating point"),
            ParseErrTyp::ParenMismatch => None,
            ParseErrTyp::StrayComma => {
                Some("commas only separate the arguments of a function, as in 'log(x, 2)'")
            }
        };
        let err = Self {
            message: format!("parse error: {}", err.typ),
            note: note.map(str::to_string),
            loc: err.loc,
        };
        debug!("rejected {:?}: {err}", err.loc.src());
        err
    }
}

impl SyntaxError {
    fn from_check(err: EvalErr, src: &Arc<String>, idents: &Idents) -> Self {
        let note = match &err.typ {
            EvalErrTyp::Empty => Some("enter an expression in x, for example 'x^2'".to_string()),
            EvalErrTyp::StackMismatch { .. } => Some(
                "implicit multiplication is not supported, so for example '5x' would be '5*x'"
                    .to_string(),
            ),
            EvalErrTyp::UndefinedIdent { text } => suggest(text.get(), idents),
            EvalErrTyp::MissingArgs { .. } | EvalErrTyp::NullVar { .. } => None,
        };
        let loc = err
            .op
            .as_ref()
            .map_or_else(|| SubStr::end(Arc::clone(src)), |op| op.loc.clone());
        let err = Self {
            message: format!("invalid expression: {err}"),
            note,
            loc,
        };
        debug!("rejected {src:?}: {err}");
        err
    }
}

fn suggest(text: &str, idents: &Idents) -> Option<String> {
    let text = text.to_ascii_lowercase();
    idents
        .iter()
        .map(|(key, ident)| {
            (
                strsim::normalized_damerau_levenshtein(&text, &key.get().to_ascii_lowercase()),
                key,
                ident,
            )
        })
        .filter(|(sim, _, _)| *sim > SUGGESTION_THRESHOLD)
        .max_by(|(a, ..), (b, ..)| a.total_cmp(b))
        .map(|(_, key, ident)| format!("{} '{key}' has a similar name", ident.kind()))
}
