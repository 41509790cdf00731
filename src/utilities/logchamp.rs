//! joe: logchamp
//! joe: call it logchamp
//! joe: please

use std::io::{self, Write};

use colored::{Color, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record};
use time::macros;

struct Logger;

impl Logger {
    fn new() -> Self {
        log::set_max_level(LevelFilter::Debug);
        Self
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match metadata.target().split("::").next() {
            Some("aider_ollama" | "launch" | "probe") => true,
            _ => metadata.level() <= Level::Info,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = time::OffsetDateTime::now_utc()
            .format(macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .unwrap_or_default();
        let level = record.level().as_str();
        let args = record.args();

        let color = match record.level() {
            Level::Error => Color::BrightRed,
            Level::Warn => Color::BrightYellow,
            Level::Info => Color::BrightCyan,
            Level::Debug => Color::Magenta,
            Level::Trace => Color::Green,
        };

        // stdout belongs to the tool output
        let _ = writeln!(
            io::stderr().lock(),
            "{} {} {args}",
            timestamp.color(Color::BrightBlack),
            level.color(color)
        );
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

pub fn init() {
    if log::set_boxed_logger(Box::new(Logger::new())).is_err() {
        eprintln!("logger already initialized");
    }
}
