// SPDX: CC0-1.0

// shunting yard algorithm by dijkstra (see https://en.wikipedia.org/wiki/Shunting_yard_algorithm)

use crate::{
    eval::{Associativity, Ident, Idents, Operation, OperationTyp, OperatorTyp, Program},
    lex::{LexErr, LexErrTyp, Lexer, SubStr, TokTyp},
    Number,
};
use core::num::ParseFloatError;

#[derive(Debug, thiserror::Error)]
pub enum ParseErrTyp {
    #[error("{0}")]
    LexErr(LexErrTyp),
    #[error("invalid number: {0}")]
    ParseNum(ParseFloatError),
    #[error("mismatched parentheses")]
    ParenMismatch,
    #[error("comma outside of a function call")]
    StrayComma,
}

#[derive(Debug, thiserror::Error)]
#[error("{typ}")]
pub struct ParseErr {
    pub typ: ParseErrTyp,
    pub loc: SubStr,
}

impl From<LexErr> for ParseErr {
    fn from(err: LexErr) -> Self {
        Self {
            typ: ParseErrTyp::LexErr(err.typ),
            loc: err.loc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShuntOpTyp {
    Operator(OperatorTyp),
    Fun,
    OpenParen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ShuntOp {
    typ: ShuntOpTyp,
    loc: SubStr,
}

impl ShuntOp {
    /// Whether this stacked operator must be output before pushing `incoming`.
    fn yields_to(&self, incoming: OperatorTyp) -> bool {
        match self.typ {
            // function application binds tighter than any operator
            ShuntOpTyp::Fun => true,
            ShuntOpTyp::Operator(stacked) => {
                stacked.precedence() > incoming.precedence()
                    || (stacked.precedence() == incoming.precedence()
                        && incoming.associativity() == Associativity::Left)
            }
            ShuntOpTyp::OpenParen => false,
        }
    }

    fn into_output(self) -> Result<Operation, ParseErr> {
        let typ = match self.typ {
            ShuntOpTyp::Operator(typ) => OperationTyp::Operator(typ),
            ShuntOpTyp::Fun => OperationTyp::Ident,
            ShuntOpTyp::OpenParen => {
                return Err(ParseErr {
                    typ: ParseErrTyp::ParenMismatch,
                    loc: self.loc,
                })
            }
        };
        Ok(Operation { typ, loc: self.loc })
    }
}

/// Moves operators to `out` until an open parenthesis is on top of `ops`.
fn pop_until_paren(ops: &mut Vec<ShuntOp>, out: &mut Vec<Operation>) -> Result<(), ParseErr> {
    while ops
        .last()
        .is_some_and(|top| top.typ != ShuntOpTyp::OpenParen)
    {
        if let Some(op) = ops.pop() {
            out.push(op.into_output()?);
        }
    }
    Ok(())
}

pub fn parse(lex: Lexer<'_>, idents: &Idents) -> Result<Program, ParseErr> {
    let mut out: Vec<Operation> = Vec::new(); // output
    let mut ops: Vec<ShuntOp> = Vec::new(); // operator stack

    for tok in lex {
        let tok = tok?;
        match tok.typ {
            TokTyp::Number => {
                let num: Number = tok.loc.get().parse().map_err(|err| ParseErr {
                    typ: ParseErrTyp::ParseNum(err),
                    loc: tok.loc.clone(),
                })?;
                out.push(Operation {
                    typ: OperationTyp::Val(num),
                    loc: tok.loc,
                });
            }

            TokTyp::Ident => {
                if let Some(Ident::Fun(_)) = idents.get(&tok.loc.clone().into()) {
                    ops.push(ShuntOp {
                        typ: ShuntOpTyp::Fun,
                        loc: tok.loc,
                    });
                } else {
                    // constants, variables, and unknown names (reported by
                    // `eval::check`) are all operands
                    out.push(Operation {
                        typ: OperationTyp::Ident,
                        loc: tok.loc,
                    });
                }
            }

            TokTyp::Op(incoming) => {
                // a prefix operator has no left operand to reduce
                if !incoming.is_prefix() {
                    while ops.last().is_some_and(|top| top.yields_to(incoming)) {
                        if let Some(top) = ops.pop() {
                            out.push(top.into_output()?);
                        }
                    }
                }
                ops.push(ShuntOp {
                    typ: ShuntOpTyp::Operator(incoming),
                    loc: tok.loc,
                });
            }

            TokTyp::Comma => {
                pop_until_paren(&mut ops, &mut out)?;

                // arguments are only separated directly inside a call's parentheses
                let in_call = matches!(
                    ops.as_slice(),
                    [
                        ..,
                        ShuntOp {
                            typ: ShuntOpTyp::Fun,
                            ..
                        },
                        ShuntOp {
                            typ: ShuntOpTyp::OpenParen,
                            ..
                        }
                    ]
                );
                if !in_call {
                    return Err(ParseErr {
                        typ: ParseErrTyp::StrayComma,
                        loc: tok.loc,
                    });
                }
            }

            TokTyp::OpenParen => {
                ops.push(ShuntOp {
                    typ: ShuntOpTyp::OpenParen,
                    loc: tok.loc,
                });
            }

            TokTyp::CloseParen => {
                pop_until_paren(&mut ops, &mut out)?;

                if ops.pop().is_none() {
                    return Err(ParseErr {
                        typ: ParseErrTyp::ParenMismatch,
                        loc: tok.loc,
                    });
                }

                // parenthesis closed a call's argument list
                if ops.last().is_some_and(|top| top.typ == ShuntOpTyp::Fun) {
                    if let Some(fun) = ops.pop() {
                        out.push(fun.into_output()?);
                    }
                }
            }

            TokTyp::XGreater
            | TokTyp::XLess
            | TokTyp::XEqual
            | TokTyp::XPipe
            | TokTyp::XOpenSquareBracket
            | TokTyp::XCloseSquareBracket
            | TokTyp::XOpenCurly
            | TokTyp::XCloseCurly => unreachable!("unsupported token survived until parsing"),
        }
    }

    while let Some(op) = ops.pop() {
        out.push(op.into_output()?);
    }

    Ok(Program::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib;
    use std::sync::Arc;

    fn parse_str(src: &str) -> Result<Program, ParseErr> {
        let src = Arc::new(src.to_string());
        parse(Lexer::new(&src), &stdlib::standard_idents())
    }

    fn postfix(src: &str) -> Vec<String> {
        parse_str(src)
            .expect("parses")
            .ops()
            .map(|op| match op.typ {
                OperationTyp::Val(val) => val.to_string(),
                OperationTyp::Operator(typ) => typ.fun().0.to_string(),
                OperationTyp::Ident => op.loc.get().to_string(),
            })
            .collect()
    }

    #[test]
    fn orders_operators_by_precedence() {
        assert_eq!(postfix("1 + 2 * x"), ["1", "2", "x", "mul", "add"]);
        assert_eq!(postfix("(1 + 2) * x"), ["1", "2", "add", "x", "mul"]);
        assert_eq!(postfix("x ^ 2 ^ 3"), ["x", "2", "3", "pow", "pow"]);
    }

    #[test]
    fn negation_is_prefix() {
        assert_eq!(postfix("-x^2"), ["x", "2", "pow", "neg"]);
        assert_eq!(postfix("-2 * x"), ["2", "neg", "x", "mul"]);
        assert_eq!(postfix("2 ^ -x"), ["2", "x", "neg", "pow"]);
    }

    #[test]
    fn functions_take_comma_separated_arguments() {
        assert_eq!(postfix("log(x, -1)"), ["x", "1", "neg", "log"]);
        assert_eq!(
            postfix("sin(x) + cos(2 * x)"),
            ["x", "sin", "2", "x", "mul", "cos", "add"]
        );
    }

    #[test]
    fn function_without_parentheses_binds_tightly() {
        assert_eq!(postfix("sin x + 1"), ["x", "sin", "1", "add"]);
    }

    #[test]
    fn unbalanced_parentheses_fail() {
        let err = parse_str("(x + 1").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::ParenMismatch));
        assert_eq!(err.loc.start(), 0);

        let err = parse_str("x + 1)").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::ParenMismatch));
        assert_eq!(err.loc.start(), 5);
    }

    #[test]
    fn comma_needs_an_enclosing_call() {
        let err = parse_str("log((x, 2))").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::StrayComma));
        assert_eq!(err.loc.start(), 6);

        let err = parse_str("x, 2").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::StrayComma));

        assert_eq!(postfix("log((x), 2)"), ["x", "2", "log"]);
        assert_eq!(postfix("log(sin(x), 2)"), ["x", "sin", "2", "log"]);
    }

    #[test]
    fn malformed_number_fails() {
        let err = parse_str("1.2.3 * x").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::ParseNum(_)));
        assert_eq!(err.loc.get(), "1.2.3");
    }

    #[test]
    fn lex_errors_carry_location() {
        let err = parse_str("x > 2").unwrap_err();
        assert!(matches!(err.typ, ParseErrTyp::LexErr(LexErrTyp::Unsupported(_))));
        assert_eq!(err.loc.start(), 2);
    }
}
