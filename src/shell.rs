// SPDX: CC0-1.0

use crate::{
    eval::Program,
    expr::SyntaxError,
    lex::SubStr,
    plot::{FunctionEntry, FunctionStatus},
};
use anyhow::Context;
use core::fmt;
use std::{
    io::{self, stdin, BufRead, Write},
    sync::Arc,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Add,
    Edit,
    Remove,
    Color,
    Toggle,
    List,
    PrintProg,
    ZoomIn,
    ZoomOut,
    Reset,
    SetWin,
    SetCanvas,
    Plot,
}

impl Command {
    pub const fn exhaustive() -> &'static [Command] {
        &[
            Self::Help,
            Self::Quit,
            Self::Add,
            Self::Edit,
            Self::Remove,
            Self::Color,
            Self::Toggle,
            Self::List,
            Self::PrintProg,
            Self::ZoomIn,
            Self::ZoomOut,
            Self::Reset,
            Self::SetWin,
            Self::SetCanvas,
            Self::Plot,
        ]
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Help => "display help for each command",
            Self::Quit => "quit the shell",
            Self::Add => "add a function of x to plot",
            Self::Edit => "change the expression of a function",
            Self::Remove => "remove a function",
            Self::Color => "change the color of a function",
            Self::Toggle => "show or hide a function",
            Self::List => "list functions and their status",
            Self::PrintProg => "print program compiled from a function (for debugging)",
            Self::ZoomIn => "zoom in (scale every window bound by 0.8)",
            Self::ZoomOut => "zoom out (scale every window bound by 1.2)",
            Self::Reset => "reset window to [-10, 10] x [-10, 10]",
            Self::SetWin => "set window bounds",
            Self::SetCanvas => "set canvas width (height is 3/5 of it)",
            Self::Plot => "plot visible functions to an svg file",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Remove => "remove",
            Self::Color => "color",
            Self::Toggle => "toggle",
            Self::List => "list",
            Self::PrintProg => "prog",
            Self::ZoomIn => "in",
            Self::ZoomOut => "out",
            Self::Reset => "reset",
            Self::SetWin => "window",
            Self::SetCanvas => "canvas",
            Self::Plot => "plot",
        }
    }
}

impl core::str::FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive()
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or(())
    }
}

pub fn input<W: Write>(out: W, prompt: impl fmt::Display) -> anyhow::Result<String> {
    fn inner<W: Write>(mut out: W, prompt: impl fmt::Display) -> io::Result<String> {
        write!(out, "{prompt}")?;
        out.flush()?;
        let mut stdin = stdin().lock();
        let mut s = String::new();
        stdin.read_line(&mut s)?;
        Ok(s.trim().to_string())
    }

    let s = inner(out, prompt).context("read from standard input failed")?;
    Ok(s)
}

pub fn read_fromstr<W: Write, T: core::str::FromStr>(
    mut out: W,
    prompt: impl fmt::Display,
    ignore_empty: bool,
) -> anyhow::Result<Result<Option<T>, <T as core::str::FromStr>::Err>>
where
    <T as core::str::FromStr>::Err: fmt::Display,
{
    let input = Arc::new(input(&mut out, prompt)?);
    if ignore_empty && input.is_empty() {
        return Ok(Ok(None));
    }
    match input.parse::<T>() {
        Ok(new) => Ok(Ok(Some(new))),
        Err(err) => {
            writeln!(out)?;
            underline(&mut out, &SubStr::all(input))?;
            writeln!(out, "parse error: {err}")?;
            Ok(Err(err))
        }
    }
}

pub fn underline<W: Write>(mut out: W, span: &SubStr) -> io::Result<()> {
    writeln!(out, "{}", span.src())?;
    writeln!(
        out,
        "{}{}",
        " ".repeat(span.start()),
        // zero-width spans point just past the end
        "^".repeat(span.len().max(1))
    )?;
    Ok(())
}

pub fn syntax_error<W: Write>(mut out: W, err: &SyntaxError) -> io::Result<()> {
    underline(&mut out, &err.loc)?;
    writeln!(out, "{err}")?;
    if let Some(ref note) = err.note {
        writeln!(out, "note: {note}")?;
    }
    Ok(())
}

pub fn dump_program<W: Write>(
    mut out: W,
    prog: &Program,
    title: core::fmt::Arguments,
) -> io::Result<()> {
    writeln!(out, "{title}: ")?;
    if prog.ops().len() == 0 {
        writeln!(out, "  (empty)")?;
    }
    for op in prog.ops() {
        writeln!(out, "  {op}")?;
    }
    Ok(())
}

pub fn list_entry<W: Write>(
    mut out: W,
    entry: &FunctionEntry,
    status: Option<&FunctionStatus>,
) -> io::Result<()> {
    let shown = if entry.visible { "shown" } else { "hidden" };
    let status = match status {
        None => "not plotted",
        Some(FunctionStatus::Ok) => "ok",
        Some(FunctionStatus::ParseFailed(_)) => "error",
    };
    writeln!(
        out,
        "{id}: y = {expr}  [{color}, {shown}, {status}]",
        id = entry.id,
        expr = entry.expr,
        color = entry.color,
    )
}

pub fn no_such_function<W: Write>(mut out: W) -> io::Result<()> {
    writeln!(out, r#"error: no such function, try "list" to see them"#)
}
