use anyhow::{Context, Result};
use colored::{Color, Colorize};
use env_logger::{Builder, Target};
use log::Level;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Colours used for the frontier summary.
pub struct Colors;

impl Colors {
    pub const UNVISITED: Color = Color::Yellow;
    pub const VISITED: Color = Color::Green;
    pub const ERROR: Color = Color::Red;

    pub fn colorize(color: Color, text: &str) -> String {
        text.color(color).to_string()
    }
}

/// Writes every record to stderr and appends it to a log file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

pub fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use log::LevelFilter;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = Builder::from_default_env();
    builder
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        });

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        // No ANSI escapes in the file sink.
        colored::control::set_override(false);
        builder.target(Target::Pipe(Box::new(TeeWriter { file })));
    }

    builder.try_init().context("install logger")?;
    Ok(())
}
