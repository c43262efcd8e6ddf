use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

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

/// Pretty output with a colored header line; plain JSON in `--json` mode.
pub fn print_labeled<T: Serialize>(label: &str, value: &T) -> anyhow::Result<()> {
    if is_json() {
        return print(value);
    }
    let mut out = StandardStream::stdout(ColorChoice::Auto);
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(out, "{label}")?;
    out.reset()?;
    writeln!(out, ":")?;
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
