// SPDX: CC0-1.0

use crate::{lex::SubStr, stdlib, Number};
use core::fmt;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorTyp {
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

impl OperatorTyp {
    pub const fn precedence(&self) -> i8 {
        match self {
            Self::Add => 2,
            Self::Sub => 2,
            Self::Mul => 3,
            Self::Div => 3,
            Self::Neg => 4,
            Self::Pow => 5,
        }
    }

    pub const fn associativity(&self) -> Associativity {
        use Associativity::{Left, Right};
        match self {
            Self::Neg => Right,
            Self::Add => Left,
            Self::Sub => Left,
            Self::Mul => Left,
            Self::Div => Left,
            Self::Pow => Right,
        }
    }

    pub const fn is_prefix(&self) -> bool {
        matches!(self, Self::Neg)
    }

    pub const fn fun(&self) -> (&'static str, Fun) {
        match self {
            Self::Neg => ("neg", Fun::new(1, stdlib::neg)),
            Self::Add => ("add", Fun::new(2, stdlib::add)),
            Self::Sub => ("sub", Fun::new(2, stdlib::sub)),
            Self::Mul => ("mul", Fun::new(2, stdlib::mul)),
            Self::Div => ("div", Fun::new(2, stdlib::div)),
            Self::Pow => ("pow", Fun::new(2, stdlib::pow)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum OperationTyp {
    Operator(OperatorTyp),
    Val(Number),
    Ident,
}

#[derive(Clone, Debug)]
pub struct Operation {
    pub typ: OperationTyp,
    pub loc: SubStr,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.typ {
            OperationTyp::Val(val) => write!(f, "push {val}"),
            OperationTyp::Operator(typ) => write!(f, "call '{}'", typ.fun().0),
            OperationTyp::Ident => write!(f, "load '{}'", self.loc.get()),
        }
    }
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvalErrTyp {
    #[error("cannot evaluate empty program")]
    Empty,

    #[error(
        "function '{name}' requires {arity} argument{s}, but found {found}",
        s = plural(.arity)
    )]
    MissingArgs {
        name: IdentKey,
        arity: usize,
        found: usize,
    },

    #[error(
        "expected {expected} value{s} on the stack but found {found}",
        s = plural(.expected)
    )]
    StackMismatch { expected: usize, found: usize },

    #[error("undefined identifier '{text}'")]
    UndefinedIdent { text: SubStr },

    #[error("variable '{text}' is declared but its value is not defined")]
    NullVar { text: SubStr },
}

#[derive(Debug, thiserror::Error)]
#[error("{typ}")]
pub struct EvalErr {
    pub typ: EvalErrTyp,
    pub op: Option<Operation>, // if none, associated with end-of-program checking
}

#[derive(Clone, Copy, Debug)]
pub struct Fun {
    pub arity: usize,
    pub fun: fn(Vec<Number>) -> Number,
}

impl Fun {
    pub const fn new(arity: usize, fun: fn(Vec<Number>) -> Number) -> Self {
        Self { arity, fun }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Ident {
    Var,
    Const(Number),
    Fun(Fun),
}

impl Ident {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Var => "variable",
            Self::Const(_) => "constant",
            Self::Fun(_) => "function",
        }
    }
}

#[derive(Clone, Debug, Eq)]
pub enum IdentKey {
    Arc(SubStr),
    Static(&'static str),
}

impl PartialEq for IdentKey {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl core::hash::Hash for IdentKey {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.get().hash(state)
    }
}

impl IdentKey {
    pub fn get(&self) -> &str {
        match self {
            Self::Arc(s) => s.get(),
            Self::Static(s) => s,
        }
    }
}

impl fmt::Display for IdentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

impl From<SubStr> for IdentKey {
    fn from(s: SubStr) -> Self {
        Self::Arc(s)
    }
}

impl From<&'static str> for IdentKey {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

pub type Idents = HashMap<IdentKey, Ident>;

/// Postfix program produced by the parser.
#[derive(Clone, Debug)]
pub struct Program {
    pub(crate) ops: Vec<Operation>,
}

impl Program {
    #[inline]
    pub const fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    #[inline]
    pub fn ops(&self) -> core::slice::Iter<'_, Operation> {
        self.ops.iter()
    }
}

fn expect_fun_args(
    depth: usize,
    op: &Operation,
    name: impl Into<IdentKey>,
    fun: &Fun,
) -> Result<(), EvalErr> {
    if depth < fun.arity {
        Err(EvalErr {
            typ: EvalErrTyp::MissingArgs {
                arity: fun.arity,
                found: depth,
                name: name.into(),
            },
            op: Some(op.clone()),
        })
    } else {
        Ok(())
    }
}

fn expect_single_result(depth: usize) -> Result<(), EvalErr> {
    if depth == 1 {
        Ok(())
    } else {
        Err(EvalErr {
            typ: EvalErrTyp::StackMismatch {
                expected: 1,
                found: depth,
            },
            op: None,
        })
    }
}

fn expect_nonempty(prog: &Program) -> Result<(), EvalErr> {
    if prog.ops.is_empty() {
        Err(EvalErr {
            typ: EvalErrTyp::Empty,
            op: None,
        })
    } else {
        Ok(())
    }
}

/// Verifies a program without evaluating it: every identifier is known,
/// every call has its arguments, and exactly one value remains at the end.
///
/// Declared variables without a value pass, since they are bound at
/// evaluation time.
pub fn check(prog: &Program, idents: &Idents) -> Result<(), EvalErr> {
    fn call(depth: &mut usize, op: &Operation, name: IdentKey, fun: &Fun) -> Result<(), EvalErr> {
        expect_fun_args(*depth, op, name, fun)?;
        *depth = *depth - fun.arity + 1;
        Ok(())
    }

    expect_nonempty(prog)?;

    let mut depth = 0usize;

    for op in prog.ops() {
        match op.typ {
            OperationTyp::Operator(typ) => {
                let (name, fun) = typ.fun();
                call(&mut depth, op, name.into(), &fun)?;
            }

            OperationTyp::Val(_) => depth += 1,

            OperationTyp::Ident => match idents.get(&op.loc.clone().into()) {
                Some(Ident::Var | Ident::Const(_)) => depth += 1,
                Some(Ident::Fun(fun)) => call(&mut depth, op, op.loc.clone().into(), fun)?,
                None => {
                    return Err(EvalErr {
                        typ: EvalErrTyp::UndefinedIdent {
                            text: op.loc.clone(),
                        },
                        op: Some(op.clone()),
                    })
                }
            },
        }
    }

    expect_single_result(depth)
}

/// Evaluates `prog`, looking variables up in `bindings` before `idents`.
pub fn eval(
    prog: &Program,
    idents: &Idents,
    bindings: &[(&str, Number)],
    stack: &mut Vec<Number>,
) -> Result<Number, EvalErr> {
    fn eval_fun(
        stack: &mut Vec<Number>,
        op: &Operation,
        name: impl Into<IdentKey>,
        fun: &Fun,
    ) -> Result<Number, EvalErr> {
        expect_fun_args(stack.len(), op, name, fun)?;
        // stack: ...a, b, c, d
        //                 ^^^^ args if arity is 2
        let args = stack.split_off(stack.len() - fun.arity);
        Ok((fun.fun)(args))
    }

    expect_nonempty(prog)?;
    stack.clear();

    for op in prog.ops() {
        match op.typ {
            OperationTyp::Operator(typ) => {
                let (name, fun) = typ.fun();
                let val = eval_fun(stack, op, name, &fun)?;
                stack.push(val);
            }

            OperationTyp::Val(num) => stack.push(num),

            OperationTyp::Ident => {
                let sym = op.loc.clone();
                let bound = bindings
                    .iter()
                    .find(|(name, _)| *name == sym.get())
                    .map(|&(_, val)| val);
                let val = match (bound, idents.get(&sym.clone().into())) {
                    (Some(val), Some(Ident::Var) | None) => val,
                    (_, Some(Ident::Const(val))) => *val,
                    (_, Some(Ident::Fun(fun))) => eval_fun(stack, op, sym, fun)?,
                    (None, Some(Ident::Var)) => {
                        return Err(EvalErr {
                            typ: EvalErrTyp::NullVar { text: sym },
                            op: Some(op.clone()),
                        });
                    }
                    (None, None) => {
                        return Err(EvalErr {
                            typ: EvalErrTyp::UndefinedIdent { text: sym },
                            op: Some(op.clone()),
                        });
                    }
                };
                stack.push(val);
            }
        }
    }

    expect_single_result(stack.len())?;
    stack.pop().ok_or(EvalErr {
        typ: EvalErrTyp::Empty,
        op: None,
    })
}
