//! Console messages: one icon + colour per severity.
//!
//! Colours are dropped when `NO_COLOR` is set, so piped output and CI logs
//! stay readable.

use std::env;
use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Clone, Copy)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn icon(self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Info => "\x1b[34m",
            Level::Success => "\x1b[32m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
        }
    }
}

fn use_color() -> bool {
    env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}

fn line<T: fmt::Display>(level: Level, msg: T) -> String {
    if use_color() {
        format!("{}{}{} {}{}", level.color(), BOLD, level.icon(), RESET, msg)
    } else {
        format!("{} {}", level.icon(), msg)
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", line(Level::Info, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", line(Level::Success, msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", line(Level::Warning, msg));
}

/// Errors go to stderr.
pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", line(Level::Error, msg));
}

/// Section title before a table.
pub fn header<T: fmt::Display>(msg: T) {
    if use_color() {
        println!("{}{}== {} =={}", Level::Info.color(), BOLD, msg, RESET);
    } else {
        println!("== {} ==", msg);
    }
}
