//! The input-source stack: terminal at slot 0, nested `SOURCE`d files above
//! it, bounded to eight deep. Provides `KEY` (one character) and `WORD`
//! (the next whitespace-delimited token) to the outer interpreter.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use crate::messages::Msg;

pub const MAX_SOURCES: usize = 8;
pub const LINE_MAX: usize = 256;
pub const PATH_MAX: usize = 16;

enum Reader {
    Terminal,
    File(BufReader<File>),
    /// A single line fed in directly (non-interactive scripting, the
    /// `.tomoko` init file, tests). Exhausting it ends the call rather than
    /// falling back to whatever source sits beneath it.
    Line(Option<String>),
}

struct Source {
    reader: Reader,
    line: Vec<u8>,
    next: usize,
    line_number: usize,
    short_name: String,
}

impl Source {
    fn terminal() -> Source {
        Source {
            reader: Reader::Terminal,
            line: Vec::new(),
            next: 0,
            line_number: 0,
            short_name: "terminal".to_string(),
        }
    }

    fn file(path: &str, file: File) -> Source {
        let mut short_name = path.to_string();
        short_name.truncate(PATH_MAX - 1);
        Source {
            reader: Reader::File(BufReader::new(file)),
            line: Vec::new(),
            next: 0,
            line_number: 0,
            short_name,
        }
    }

    fn line(text: &str) -> Source {
        Source {
            reader: Reader::Line(Some(text.to_string())),
            line: Vec::new(),
            next: 0,
            line_number: 0,
            short_name: "(line)".to_string(),
        }
    }

    fn refill(&mut self, prompt: &str) -> bool {
        self.line.clear();
        self.next = 0;
        match &mut self.reader {
            Reader::Terminal => {
                print!("{prompt}");
                let _ = io::stdout().flush();
                let mut raw = String::new();
                if io::stdin().read_line(&mut raw).unwrap_or(0) == 0 {
                    return false;
                }
                self.line = raw.into_bytes();
            }
            Reader::File(reader) => {
                let mut raw = String::new();
                if reader.read_line(&mut raw).unwrap_or(0) == 0 {
                    return false;
                }
                self.line = raw.into_bytes();
            }
            Reader::Line(opt) => match opt.take() {
                Some(mut text) => {
                    if !text.ends_with('\n') {
                        text.push('\n');
                    }
                    self.line = text.into_bytes();
                }
                None => return false,
            },
        }
        if self.line.len() > LINE_MAX {
            self.line.truncate(LINE_MAX);
        }
        self.line_number += 1;
        true
    }

    fn next_char(&mut self, prompt: &str) -> Option<u8> {
        loop {
            if self.next < self.line.len() {
                let c = self.line[self.next];
                self.next += 1;
                return Some(c);
            }
            if !self.refill(prompt) {
                return None;
            }
        }
    }

    fn push_back(&mut self) {
        if self.next > 0 {
            self.next -= 1;
        }
    }
}

pub struct InputStack {
    sources: Vec<Source>,
}

impl Default for InputStack {
    fn default() -> Self {
        Self::new()
    }
}

fn is_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'
}

impl InputStack {
    pub fn new() -> InputStack {
        InputStack {
            sources: vec![Source::terminal()],
        }
    }

    pub fn depth(&self) -> usize {
        self.sources.len()
    }

    pub fn current_name(&self) -> &str {
        &self.sources.last().expect("input stack never empty").short_name
    }

    pub fn current_line_number(&self) -> usize {
        self.sources.last().expect("input stack never empty").line_number
    }

    /// `SOURCE` ( addr len -- ): push a named file as the active input
    /// source. Fails (returns false) past `MAX_SOURCES` or on an open error.
    pub fn source(&mut self, path: &str, msg: &Msg) -> bool {
        if self.sources.len() >= MAX_SOURCES {
            msg.error("SOURCE", "input source stack is full", Some(path));
            return false;
        }
        match File::open(path) {
            Ok(file) => {
                self.sources.push(Source::file(path, file));
                true
            }
            Err(e) => {
                msg.error("SOURCE", "unable to open file", Some(e));
                false
            }
        }
    }

    /// `ENDSOURCE` ( -- ): pop the current file source. The terminal at
    /// slot 0 can never be popped.
    pub fn endsource(&mut self) {
        if self.sources.len() > 1 {
            self.sources.pop();
        }
    }

    /// `KEY` ( -- ch ): next raw character, prompting and refilling the
    /// line buffer as needed. Returns `None` at end of all input. A spent
    /// one-shot `Line` source is left in place for the caller to remove
    /// with `unload_line`, rather than falling back to what's beneath it.
    pub fn key(&mut self, prompt: &str) -> Option<u8> {
        loop {
            let depth = self.sources.len();
            let is_line = matches!(
                self.sources.last().expect("input stack never empty").reader,
                Reader::Line(_)
            );
            let top = self.sources.last_mut().expect("input stack never empty");
            match top.next_char(prompt) {
                Some(c) => return Some(c),
                None => {
                    if is_line || depth == 1 {
                        return None;
                    }
                    self.sources.pop();
                }
            }
        }
    }

    /// Pushes a single line as a one-shot input source, for non-interactive
    /// scripting (the `.tomoko` init file, `interpret_line`, tests).
    pub fn load_line(&mut self, text: &str) {
        self.sources.push(Source::line(text));
    }

    /// Pops a spent `load_line` source. A no-op if the top isn't one,
    /// so callers can always pair it with `load_line` unconditionally.
    pub fn unload_line(&mut self) {
        if matches!(self.sources.last().map(|s| &s.reader), Some(Reader::Line(_))) {
            self.sources.pop();
        }
    }

    pub fn push_back(&mut self) {
        self.sources.last_mut().expect("input stack never empty").push_back();
    }

    /// `WORD` ( -- token ): skip leading whitespace, collect bytes up to the
    /// next whitespace or end of input, truncating silently (as whitespace
    /// had been seen) past `buf_len`.
    pub fn word(&mut self, prompt: &str, buf_len: usize, msg: &Msg) -> Vec<u8> {
        let mut out = Vec::new();
        loop {
            match self.key(prompt) {
                Some(c) if is_whitespace(c) => continue,
                Some(c) => {
                    out.push(c);
                    break;
                }
                None => return out,
            }
        }
        loop {
            match self.key(prompt) {
                Some(c) if is_whitespace(c) => {
                    self.push_back();
                    break;
                }
                Some(c) => {
                    if out.len() >= buf_len {
                        msg.warning("WORD", "token truncated at buffer length", Some(buf_len));
                        self.push_back();
                        break;
                    }
                    out.push(c);
                }
                None => break,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_skips_leading_whitespace() {
        // exercised indirectly through ForthRuntime in interpreter.rs tests;
        // this module's own tests stick to Source-free behaviour.
        assert!(is_whitespace(b' '));
        assert!(is_whitespace(b'\t'));
        assert!(!is_whitespace(b'a'));
    }

    #[test]
    fn new_stack_starts_with_terminal_only() {
        let input = InputStack::new();
        assert_eq!(input.depth(), 1);
        assert_eq!(input.current_name(), "terminal");
    }

    #[test]
    fn endsource_never_pops_the_terminal() {
        let mut input = InputStack::new();
        input.endsource();
        assert_eq!(input.depth(), 1);
    }
}
