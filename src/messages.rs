//! Leveled diagnostics for the interpreter.
//!
//! There is no structured error/exception path in the core (spec §7):
//! primitives either report inline (an unrecognised token plus `?`) or
//! call into `die`-style fatal exit (resource errors at start-up). This
//! module is the single place both paths funnel through.

use std::fmt::Debug;
use std::io::{self, Write};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

#[derive(Debug, Clone)]
pub struct Msg {
    level: DebugLevel,
}

impl Default for Msg {
    fn default() -> Self {
        Self::new()
    }
}

impl Msg {
    pub fn new() -> Msg {
        Msg {
            level: DebugLevel::Error,
        }
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level
    }

    fn emit<T: Debug>(&self, level: DebugLevel, tag: &str, caller: &str, text: &str, detail: Option<T>) {
        if self.level < level {
            return;
        }
        match detail {
            Some(d) => eprintln!("[{tag}] {caller}: {text} ({d:?})"),
            None => eprintln!("[{tag}] {caller}: {text}"),
        }
    }

    /// Report a recoverable error. Control returns to the caller; the outer
    /// interpreter is responsible for getting back to `QUIT`.
    pub fn error<T: Debug>(&self, caller: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Error, "error", caller, text, detail);
    }

    pub fn warning<T: Debug>(&self, caller: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Warning, "warning", caller, text, detail);
    }

    pub fn info<T: Debug>(&self, caller: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Info, "info", caller, text, detail);
    }

    pub fn debug<T: Debug>(&self, caller: &str, text: &str, detail: Option<T>) {
        self.emit(DebugLevel::Debug, "debug", caller, text, detail);
    }

    /// A resource error (spec §7): print to stderr and exit with failure,
    /// matching the reference `die()` in input.c.
    pub fn fatal(&self, text: &str) -> ! {
        eprintln!("{text}");
        let _ = io::stderr().flush();
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_error() {
        let msg = Msg::new();
        assert_eq!(msg.get_level(), DebugLevel::Error);
    }

    #[test]
    fn set_and_get_level() {
        let mut msg = Msg::new();
        msg.set_level(DebugLevel::Debug);
        assert_eq!(msg.get_level(), DebugLevel::Debug);
    }

    #[test]
    fn level_ordering_gates_emit() {
        assert!(DebugLevel::Error < DebugLevel::Warning);
        assert!(DebugLevel::Warning < DebugLevel::Info);
        assert!(DebugLevel::Info < DebugLevel::Debug);
    }
}
