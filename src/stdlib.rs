// SPDX: CC0-1.0

use crate::{eval::*, Number};
use core::f64::consts;
use std::collections::HashMap; // assumes Number = f64

/// The plotted variable.
pub const X: &str = "x";

pub fn standard_idents() -> Idents {
    let mut ret = HashMap::new();

    ret.insert(X.into(), Ident::Var);

    // operators
    for op in [
        OperatorTyp::Neg,
        OperatorTyp::Add,
        OperatorTyp::Sub,
        OperatorTyp::Mul,
        OperatorTyp::Div,
        OperatorTyp::Pow,
    ] {
        let (name, fun) = op.fun();
        ret.insert(name.into(), Ident::Fun(fun));
    }

    ret.insert("abs".into(), Ident::Fun(Fun::new(1, abs)));
    ret.insert("sqrt".into(), Ident::Fun(Fun::new(1, sqrt)));
    ret.insert("exp".into(), Ident::Fun(Fun::new(1, exp)));
    ret.insert("ln".into(), Ident::Fun(Fun::new(1, ln)));
    ret.insert("log".into(), Ident::Fun(Fun::new(2, log)));
    ret.insert("floor".into(), Ident::Fun(Fun::new(1, floor)));
    ret.insert("ceil".into(), Ident::Fun(Fun::new(1, ceil)));

    // trig
    ret.insert("sin".into(), Ident::Fun(Fun::new(1, sin)));
    ret.insert("cos".into(), Ident::Fun(Fun::new(1, cos)));
    ret.insert("tan".into(), Ident::Fun(Fun::new(1, tan)));
    ret.insert("asin".into(), Ident::Fun(Fun::new(1, arcsin)));
    ret.insert("acos".into(), Ident::Fun(Fun::new(1, arccos)));
    ret.insert("atan".into(), Ident::Fun(Fun::new(1, arctan)));
    ret.insert("arcsin".into(), Ident::Fun(Fun::new(1, arcsin)));
    ret.insert("arccos".into(), Ident::Fun(Fun::new(1, arccos)));
    ret.insert("arctan".into(), Ident::Fun(Fun::new(1, arctan)));

    ret.insert("pi".into(), Ident::Const(consts::PI));
    ret.insert("tau".into(), Ident::Const(consts::TAU));
    ret.insert("e".into(), Ident::Const(consts::E));
    ret
}

#[track_caller]
fn expect_n<const N: usize>(args: Vec<Number>) -> [Number; N] {
    let len = args.len();
    match args.try_into() {
        Ok(args) => args,
        Err(_) => panic!("expected {N} arguments, found {len}"),
    }
}

pub fn neg(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    -x
}

pub fn add(args: Vec<Number>) -> Number {
    let [x, y] = expect_n::<2>(args);
    x + y
}

pub fn sub(args: Vec<Number>) -> Number {
    let [x, y] = expect_n::<2>(args);
    x - y
}

pub fn mul(args: Vec<Number>) -> Number {
    let [x, y] = expect_n::<2>(args);
    x * y
}

pub fn div(args: Vec<Number>) -> Number {
    let [x, y] = expect_n::<2>(args);
    x / y
}

pub fn pow(args: Vec<Number>) -> Number {
    let [x, exp] = expect_n::<2>(args);
    x.powf(exp)
}

pub fn abs(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.abs()
}

pub fn sqrt(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.sqrt()
}

pub fn exp(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.exp()
}

pub fn ln(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.ln()
}

pub fn log(args: Vec<Number>) -> Number {
    let [x, base] = expect_n::<2>(args);
    x.log(base)
}

pub fn floor(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.floor()
}

pub fn ceil(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.ceil()
}

pub fn sin(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.sin()
}

pub fn cos(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.cos()
}

pub fn tan(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.tan()
}

pub fn arcsin(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.asin()
}

pub fn arccos(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.acos()
}

pub fn arctan(args: Vec<Number>) -> Number {
    let [x] = expect_n::<1>(args);
    x.atan()
}
