//! `ForthRuntime`: a `Kernel` plus the named pointers (HERE, LATEST, BASE,
//! STATE, CASE-SENSITIVE) and machine registers (IP, W) that give it Forth
//! semantics, and the start-up sequence that bootstraps the dictionary.

use std::env;
use std::fs;

use crate::dictionary::PARAM_OFFSET;
use crate::input::InputStack;
use crate::messages::Msg;
use crate::kernel::{Kernel, DICT_START};

pub const WORD_BUF_ADDR: usize = 0;
pub const WORD_BUF_LEN: usize = 128;
pub const PAD_ADDR: usize = WORD_BUF_ADDR + WORD_BUF_LEN;
pub const PAD_LEN: usize = 128;

pub const VERSION: i64 = 100; // 0.01.00
pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_QUITPROMPT: &str = "ok ";
pub const PROMPT_MAX: usize = 6;

pub struct ForthRuntime {
    pub kernel: Kernel,
    pub msg: Msg,
    pub input: InputStack,
    pub ip: usize,
    pub w: usize,
    pub halted: bool,

    here_cell: usize,
    latest_cell: usize,
    base_cell: usize,
    state_cell: usize,
    case_sensitive_cell: usize,

    docol_index: usize,
    lit_xt: usize,
    exit_xt: usize,

    pub prompt: String,
    pub quit_prompt: String,
    pub skip_init_file: bool,
}

impl Default for ForthRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ForthRuntime {
    pub fn new() -> ForthRuntime {
        let mut kernel = Kernel::new();
        // Reserve the word buffer and PAD inside the kernel's own string
        // arena accounting so later `string_new` calls don't collide.
        kernel.set_string_ptr(PAD_ADDR + PAD_LEN);
        ForthRuntime {
            kernel,
            msg: Msg::new(),
            input: InputStack::new(),
            ip: 0,
            w: 0,
            halted: false,
            here_cell: 0,
            latest_cell: 0,
            base_cell: 0,
            state_cell: 0,
            case_sensitive_cell: 0,
            docol_index: 0,
            lit_xt: 0,
            exit_xt: 0,
            prompt: DEFAULT_PROMPT.to_string(),
            quit_prompt: DEFAULT_QUITPROMPT.to_string(),
            skip_init_file: false,
        }
    }

    pub fn here(&self) -> usize {
        self.kernel.get(self.here_cell) as usize
    }

    pub fn set_here(&mut self, val: usize) {
        self.kernel.set(self.here_cell, val as i64);
    }

    pub fn latest(&self) -> usize {
        self.kernel.get(self.latest_cell) as usize
    }

    pub fn set_latest(&mut self, val: usize) {
        self.kernel.set(self.latest_cell, val as i64);
    }

    pub fn base(&self) -> i64 {
        self.kernel.get(self.base_cell)
    }

    pub fn set_base(&mut self, val: i64) {
        self.kernel.set(self.base_cell, val);
    }

    pub fn state(&self) -> i64 {
        self.kernel.get(self.state_cell)
    }

    pub fn set_state(&mut self, val: i64) {
        self.kernel.set(self.state_cell, val);
    }

    pub fn is_compiling(&self) -> bool {
        self.state() != 0
    }

    pub fn case_sensitive(&self) -> bool {
        self.kernel.get(self.case_sensitive_cell) != 0
    }

    pub fn set_case_sensitive(&mut self, val: bool) {
        self.kernel.set(self.case_sensitive_cell, if val { 1 } else { 0 });
    }

    /// `WORD`: read the next token from the active input source into the
    /// word buffer, return its (address, length).
    pub fn word(&mut self) -> (usize, usize) {
        let bytes = self.input.word(&self.prompt, WORD_BUF_LEN, &self.msg);
        for (i, b) in bytes.iter().enumerate() {
            self.kernel.byte_set(WORD_BUF_ADDR + i, *b);
        }
        (WORD_BUF_ADDR, bytes.len())
    }

    /// Loads `$HOME/.tomoko` at start-up, matching `fn_INIT`'s behaviour:
    /// a missing `$HOME` is a fatal resource error, a missing or unreadable
    /// init file is not (there may simply not be one yet).
    pub fn load_init_file(&mut self) {
        if self.skip_init_file {
            return;
        }
        let home = match env::var("HOME") {
            Ok(h) => h,
            Err(_) => self.msg.fatal("INIT: $HOME is not set"),
        };
        let path = format!("{home}/.tomoko");
        if let Ok(text) = fs::read_to_string(&path) {
            for line in text.lines() {
                self.interpret_line(line);
            }
        }
    }

    /// Bootstraps the earliest few variables (HERE, LATEST, BASE, STATE,
    /// CASE-SENSITIVE) by hand, since `create`/`comma` themselves need HERE
    /// to already exist. Mirrors the reference's own `DEF_VAR` bootstrap in
    /// `tomoko.c`.
    pub fn cold_start(&mut self) {
        let var_index = crate::interpreter::register_primitives(self);

        let mut next = DICT_START;
        let mut prev = 0usize;
        let here_lfa = self.bootstrap_variable(&mut next, &mut prev, "HERE", var_index, 0);
        self.here_cell = here_lfa + PARAM_OFFSET;

        let latest_lfa = self.bootstrap_variable(&mut next, &mut prev, "LATEST", var_index, 0);
        self.latest_cell = latest_lfa + PARAM_OFFSET;

        let base_lfa = self.bootstrap_variable(&mut next, &mut prev, "BASE", var_index, 10);
        self.base_cell = base_lfa + PARAM_OFFSET;

        let state_lfa = self.bootstrap_variable(&mut next, &mut prev, "STATE", var_index, 0);
        self.state_cell = state_lfa + PARAM_OFFSET;

        let cs_lfa = self.bootstrap_variable(&mut next, &mut prev, "CASE-SENSITIVE", var_index, 1);
        self.case_sensitive_cell = cs_lfa + PARAM_OFFSET;

        // HERE now tracks real free space past the hand-built bootstrap
        // entries; everything from here on is built with create/comma.
        self.set_here(next);
        self.set_latest(cs_lfa);

        crate::interpreter::bootstrap_dictionary(self);
    }

    /// Hand-links one variable entry at `*next`, chaining it onto `*prev`
    /// (0 for the first), and returns its link-field address. Used only for
    /// the handful of variables that must exist before `create` can run.
    fn bootstrap_variable(&mut self, next: &mut usize, prev: &mut usize, name: &str, var_index: usize, initial: i64) -> usize {
        let lfa = *next;
        let name_ptr = self.kernel.string_new(name);
        self.kernel.set(lfa, *prev as i64);
        self.kernel.set(lfa + 1, name.len() as i64);
        self.kernel.set(lfa + 2, name_ptr as i64);
        self.kernel.set(lfa + 3, var_index as i64);
        self.kernel.set(lfa + 4, initial);
        *next = lfa + PARAM_OFFSET + 1;
        *prev = lfa;
        lfa
    }

    pub fn docol_index(&self) -> usize {
        self.docol_index
    }

    pub fn set_docol_index(&mut self, val: usize) {
        self.docol_index = val;
    }

    pub fn lit_xt(&self) -> usize {
        self.lit_xt
    }

    pub fn set_lit_xt(&mut self, val: usize) {
        self.lit_xt = val;
    }

    pub fn exit_xt(&self) -> usize {
        self.exit_xt
    }

    pub fn set_exit_xt(&mut self, val: usize) {
        self.exit_xt = val;
    }

    pub fn interpret_line(&mut self, line: &str) {
        crate::interpreter::interpret_line(self, line);
    }

    pub fn quit(&mut self) {
        crate::interpreter::quit(self);
    }

    pub fn call(&mut self, xt: usize) {
        crate::interpreter::call(self, xt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_registers_core_variables() {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        assert_eq!(rt.base(), 10);
        assert_eq!(rt.state(), 0);
        assert!(rt.case_sensitive());
        assert!(rt.here() > 0);
        assert!(rt.latest() > 0);
    }

    #[test]
    fn word_buffer_defaults_are_distinct_regions() {
        assert!(PAD_ADDR >= WORD_BUF_ADDR + WORD_BUF_LEN);
    }
}
