use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use charity_dao_core::DaoError;

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = if is_json() {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{s}");
    Ok(())
}

/// Whether `err` is a user-facing warning rather than a failure.
pub fn is_soft(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DaoError>().map(DaoError::is_soft).unwrap_or(false)
}

#[derive(Serialize)]
struct Warning<'a> {
    ok: bool,
    warning: &'a str,
}

/// Report a soft abort: a JSON object on stdout, or a yellow line on stderr.
pub fn warn(msg: &str) -> anyhow::Result<()> {
    if is_json() {
        return print(&Warning { ok: false, warning: msg });
    }
    let mut err = StandardStream::stderr(ColorChoice::Auto);
    err.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(err, "warning")?;
    err.reset()?;
    writeln!(err, ": {msg}")?;
    Ok(())
}

/// Spinner for multi-step workflows; hidden in JSON mode.
pub fn spinner(msg: &'static str) -> ProgressBar {
    if is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
