//! quay demo host.
//!
//! Reads lines from stdin and feeds them to a console as if typed into its
//! text field. Lines starting with `/` run commands; other lines are posted
//! as messages. A line ending in `?` prints the syntax hint for the text
//! before it, and a line ending in a tab prints its completion.
//!
//! Content (items, record commands, `console.toml`) is read from the
//! directory given as the first argument, `QUAY_CONTENT`, or `./content`.

mod commands;
mod content;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use content::Content;
use quay_console::{Console, InputSession};
use quay_types::{ConsoleConfig, Key, MessageLevel};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let root = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QUAY_CONTENT").ok())
        .map_or_else(|| PathBuf::from("content"), PathBuf::from);

    let config_path = root.join("console.toml");
    let config = if config_path.is_file() {
        ConsoleConfig::load(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        ConsoleConfig::default()
    };

    let content = Content::locate(&root);
    let dispatcher = commands::dispatcher(&content).context("registering commands")?;
    log::info!("{} commands available", dispatcher.count());

    let mut console = Console::new(config, dispatcher)?;
    let mut session = InputSession::new();
    let stdout = std::io::stdout();
    let mut errors = 0;

    for line in std::io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let mut out = stdout.lock();

        let last = line.chars().next_back();
        match last.map(Key::from_char) {
            Some(Key::Complete) => {
                session.on_text_changed(&console, &line[..line.len() - 1]);
                session.on_key(&mut console, Key::Complete);
                writeln!(out, "{}", session.text())?;
            },
            _ if last == Some('?') => {
                session.on_text_changed(&console, &line[..line.len() - 1]);
                writeln!(out, "{}", session.hint().unwrap_or("(no hint)"))?;
            },
            _ => {
                session.on_text_changed(&console, &line);
                session.on_key(&mut console, Key::Submit);
            },
        }

        console.tick(Instant::now());
        errors += flush_log(&mut console, &mut out)?;
    }

    // Let deferred replies finish before exiting.
    while let Some(due) = console.tasks().next_due() {
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
        console.tick(Instant::now());
        errors += flush_log(&mut console, &mut stdout.lock())?;
    }

    log::info!("quay shut down cleanly, {errors} errors reported");
    Ok(())
}

/// Print and drop everything in the message log. Returns how many of the
/// printed lines were errors or exceptions.
fn flush_log(console: &mut Console, out: &mut impl Write) -> Result<usize> {
    for message in console.log().iter() {
        writeln!(out, "{message}")?;
    }
    let errors = console.log().at_least(MessageLevel::Error).count();
    console.log_mut().clear();
    out.flush()?;
    Ok(errors)
}
