// SPDX: CC0-1.0

use anyhow::Context;
use chrono::{DateTime, Local};
use core::num::NonZeroU32;
use function_plot::{
    expr,
    plot::{FunctionEntry, FunctionId, FunctionStatus, Plotter, Rgb},
    shell::{self, Command},
    svg::SvgSink,
    viewport::Bound,
    Canvas, Number, Viewport,
};
use log::{info, LevelFilter, Log, Metadata, Record};
use std::{
    env,
    fs::OpenOptions,
    io::{stdout, BufWriter, Write},
    process::ExitCode,
};

const LOG_ENV: &str = "FUNCTION_PLOT_LOG";
const DEFAULT_WIDTH: u32 = 800;

fn output_svg_filename(now: DateTime<Local>) -> String {
    format!(
        "{}_output-{}.{}",
        env!("CARGO_PKG_NAME"),
        now.format("%Y-%m-%d_%H-%M-%S"),
        "svg"
    )
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{} {:<5} {}: {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() -> anyhow::Result<()> {
    let level = match env::var(LOG_ENV) {
        Ok(level) => level
            .parse::<LevelFilter>()
            .with_context(|| format!("invalid {LOG_ENV} value '{level}'"))?,
        Err(_) => LevelFilter::Warn,
    };
    log::set_logger(&LOGGER).context("logger was already set")?;
    log::set_max_level(level);
    Ok(())
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("unexpected error: {err}");
            let chain = err.chain();
            if chain.len() > 1 {
                eprintln!();
                eprintln!("context:");
                for it in chain.skip(1) {
                    eprintln!("  {it}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct State {
    entries: Vec<FunctionEntry>,
    next_id: u32,
    plotter: Plotter,
    viewport: Viewport,
    canvas: Canvas,
}

impl State {
    fn entry_mut(&mut self, id: FunctionId) -> Option<&mut FunctionEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }
}

fn try_main() -> anyhow::Result<()> {
    init_logging()?;

    let mut state = State {
        entries: Vec::new(),
        next_id: 0,
        plotter: Plotter::new(),
        viewport: Viewport::default(),
        canvas: Canvas::from_width(NonZeroU32::new(DEFAULT_WIDTH).unwrap_or(NonZeroU32::MIN)),
    };

    let mut stdout = BufWriter::new(stdout());
    loop {
        writeln!(
            stdout,
            "{n} function(s), window {win}, canvas {canvas}",
            n = state.entries.len(),
            win = state.viewport,
            canvas = state.canvas
        )?;

        let mut try_cmd = shell::input(&mut stdout, "> ")?;
        try_cmd.make_ascii_lowercase();
        writeln!(stdout)?;

        if let Ok(cmd) = try_cmd.parse::<Command>() {
            match cmd {
                Command::Help => {
                    for c in Command::exhaustive() {
                        writeln!(stdout, "{name}: {help}", name = c.name(), help = c.help())?;
                    }
                }

                Command::Quit => break,

                Command::Add => add_entry(&mut stdout, &mut state)?,

                Command::Edit => edit_entry(&mut stdout, &mut state)?,

                Command::Remove => {
                    if let Some(id) = read_id(&mut stdout, &state)? {
                        state.entries.retain(|entry| entry.id != id);
                        state.plotter.forget(id);
                        writeln!(stdout, "removed {id}")?;
                    }
                }

                Command::Color => set_color(&mut stdout, &mut state)?,

                Command::Toggle => {
                    if let Some(id) = read_id(&mut stdout, &state)? {
                        if let Some(entry) = state.entry_mut(id) {
                            entry.visible = !entry.visible;
                            let shown = if entry.visible { "shown" } else { "hidden" };
                            writeln!(stdout, "{id} is now {shown}")?;
                        }
                    }
                }

                Command::List => {
                    if state.entries.is_empty() {
                        writeln!(stdout, r#"no functions, try "add""#)?;
                    }
                    for entry in &state.entries {
                        shell::list_entry(&mut stdout, entry, state.plotter.status(entry.id))?;
                    }
                }

                Command::PrintProg => {
                    if let Some(id) = read_id(&mut stdout, &state)? {
                        let entry = state.entries.iter().find(|entry| entry.id == id);
                        if let Some(entry) = entry {
                            match expr::validate(&entry.expr) {
                                Ok(expr) => shell::dump_program(
                                    &mut stdout,
                                    expr.program(),
                                    format_args!("program of {id}"),
                                )?,
                                Err(err) => shell::syntax_error(&mut stdout, &err)?,
                            }
                        }
                    }
                }

                Command::ZoomIn => state.viewport.zoom_in(),

                Command::ZoomOut => state.viewport.zoom_out(),

                Command::Reset => state.viewport.reset(),

                Command::SetWin => set_win(&mut stdout, &mut state)?,

                Command::SetCanvas => set_canvas(&mut stdout, &mut state)?,

                Command::Plot => plot(&mut stdout, &mut state)?,
            }
        } else {
            writeln!(stdout, r#"Unknown command, try "help" for help"#)?;
        }

        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

/// Prompts for a function id, reporting unknown ones.
fn read_id<W: Write>(mut out: W, state: &State) -> anyhow::Result<Option<FunctionId>> {
    match shell::read_fromstr::<_, FunctionId>(&mut out, "function (e.g. #0) = ", true)? {
        Ok(Some(id)) if state.entries.iter().any(|entry| entry.id == id) => Ok(Some(id)),
        Ok(Some(_)) => {
            shell::no_such_function(&mut out)?;
            Ok(None)
        }
        Ok(None) | Err(_) => Ok(None),
    }
}

/// Reports a syntax error right away; the entry is kept either way.
fn check_expr<W: Write>(mut out: W, src: &str) -> anyhow::Result<()> {
    if let Err(err) = expr::validate(src) {
        writeln!(out)?;
        shell::syntax_error(&mut out, &err)?;
    }
    Ok(())
}

fn add_entry<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let input = shell::input(&mut out, "y = ")?;
    if input.is_empty() {
        return Ok(());
    }

    let id = FunctionId(state.next_id);
    state.next_id += 1;
    let color = Rgb::nth_default(state.entries.len());
    check_expr(&mut out, &input)?;
    state.entries.push(FunctionEntry::new(id, input, color));
    info!("added {id}");
    writeln!(out, "added {id}")?;
    Ok(())
}

fn edit_entry<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let Some(id) = read_id(&mut out, state)? else {
        return Ok(());
    };
    let input = shell::input(&mut out, "y = ")?;
    check_expr(&mut out, &input)?;
    if let Some(entry) = state.entry_mut(id) {
        entry.expr = input;
    }
    Ok(())
}

fn set_color<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    let Some(id) = read_id(&mut out, state)? else {
        return Ok(());
    };
    if let Ok(Some(color)) = shell::read_fromstr::<_, Rgb>(&mut out, "color (#rrggbb) = ", true)? {
        if let Some(entry) = state.entry_mut(id) {
            entry.color = color;
        }
    }
    Ok(())
}

fn set_win<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "win = {:#}", state.viewport)?;
    writeln!(out)?;
    writeln!(out, "note: leave blank to skip")?;

    for &bound in Bound::exhaustive() {
        let cur = state.viewport.bound(bound);
        match shell::read_fromstr::<_, Number>(
            &mut out,
            format_args!("?{name} (is {cur}) = ", name = bound.name()),
            true,
        )? {
            Ok(Some(new)) => match state.viewport.with_bound(bound, new) {
                Ok(edited) => state.viewport = edited,
                Err(err) => {
                    writeln!(out, "error: {err}, keeping {cur}")?;
                }
            },
            Ok(None) => {}
            Err(_) => return Ok(()),
        }
    }

    Ok(())
}

fn set_canvas<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    writeln!(out, "note: width must be a nonzero integer")?;
    if let Ok(Some(width)) = shell::read_fromstr::<_, NonZeroU32>(
        &mut out,
        format_args!("?width (is {cur}) = ", cur = state.canvas.width),
        true,
    )? {
        state.canvas = Canvas::from_width(width);
    }
    Ok(())
}

fn plot<W: Write>(mut out: W, state: &mut State) -> anyhow::Result<()> {
    if let Err(err) = state.viewport.validate() {
        writeln!(out, "error: {err}")?;
        writeln!(out, r#"note: use "window" or "reset" to fix the window"#)?;
        return Ok(());
    }

    let State {
        entries,
        plotter,
        viewport,
        canvas,
        ..
    } = state;
    let mut doc = String::new();
    let svg = SvgSink::new(&mut doc, *canvas).context("failed to start svg document")?;
    plotter
        .redraw(entries, viewport, *canvas, |stroke| svg.stroke(stroke))
        .context("failed to draw svg document")?;
    svg.finish().context("failed to render svg document")?;

    let svg_path = output_svg_filename(Local::now());
    let mut file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&svg_path)
            .context("failed to open output svg file")?,
    );
    file.write_all(doc.as_bytes())
        .context("failed to write to output svg file")?;
    file.flush().context("failed to write to output svg file")?;
    file.get_ref()
        .sync_data()
        .context("failed to sync output svg file")?;

    for entry in entries.iter().filter(|entry| entry.visible) {
        match plotter.status(entry.id) {
            Some(FunctionStatus::Ok) => writeln!(out, "{}: ok", entry.id)?,
            Some(FunctionStatus::ParseFailed(err)) => {
                writeln!(out, "{}:", entry.id)?;
                shell::syntax_error(&mut out, err)?;
            }
            None => {}
        }
    }
    writeln!(out, "wrote {svg_path}")?;
    Ok(())
}
