//! The inner interpreter (threaded dispatch: DOCOL/DODOES/EXIT/BRANCH/
//! 0BRANCH/LIT/LITSTRING) and the outer interpreter's bootstrap: registering
//! every primitive, linking the dictionary entries that name them, and
//! building the handful of genuine colon-definitions (`SPACE`) that exercise
//! real threaded dispatch rather than a direct Rust primitive.

use crate::kernel::RET_START;
use crate::primitives::{self, Primitive};
use crate::runtime::ForthRuntime;

const SKIP_DICTIONARY_ENTRY: &[&str] = &["DOCOL", "DODOES", "(CONST)", "(CONST$)", "(VAR)"];

fn index_of(name: &str) -> usize {
    primitives::catalogue()
        .iter()
        .position(|(n, ..)| *n == name)
        .unwrap_or_else(|| panic!("no such primitive: {name}"))
}

/// Registers every catalogue entry into the kernel's primitive table, in
/// catalogue order, and returns the table index of the `(VAR)` primitive —
/// the only one `ForthRuntime::cold_start` needs before the dictionary
/// itself exists.
pub fn register_primitives(rt: &mut ForthRuntime) -> usize {
    for (name, func, doc, immediate) in primitives::catalogue() {
        rt.kernel.add_primitive(Primitive {
            name,
            func,
            doc,
            immediate,
        });
    }
    index_of("(VAR)")
}

/// Links a named dictionary entry for every primitive except the purely
/// structural ones that only ever appear as another word's code field, then
/// builds `SPACE` as a genuine compiled colon-definition so DOCOL/LIT/EXIT
/// dispatch is exercised by real threaded code, not just by primitives.
pub fn bootstrap_dictionary(rt: &mut ForthRuntime) {
    let catalogue = primitives::catalogue();
    let mut cfa_of = std::collections::HashMap::new();

    for (index, (name, _func, _doc, immediate)) in catalogue.iter().enumerate() {
        if SKIP_DICTIONARY_ENTRY.contains(name) {
            continue;
        }
        let lfa = rt.create(name);
        rt.comma(index as i64);
        if *immediate {
            rt.toggle_immediate(lfa);
        }
        cfa_of.insert(*name, rt.to_cfa(lfa));
    }

    rt.set_docol_index(index_of("DOCOL"));
    rt.set_lit_xt(*cfa_of.get("LIT").expect("LIT must be linked"));
    rt.set_exit_xt(*cfa_of.get("EXIT").expect("EXIT must be linked"));
    let emit_xt = *cfa_of.get("EMIT").expect("EMIT must be linked");

    rt.create("SPACE");
    rt.comma(rt.docol_index() as i64);
    rt.comma(rt.lit_xt() as i64);
    rt.comma(32);
    rt.comma(emit_xt as i64);
    rt.comma(rt.exit_xt() as i64);
}

/// Runs the word at `xt` to completion: primitives dispatch once, colon
/// definitions run the threaded loop until their EXIT unwinds the return
/// stack back past where it stood on entry. Also how `EXECUTE` dispatches.
pub fn call(rt: &mut ForthRuntime, xt: usize) {
    let base_rp = rt.kernel.return_ptr();
    dispatch_one(rt, xt);
    while rt.kernel.return_ptr() < base_rp {
        let next_xt = rt.kernel.get(rt.ip) as usize;
        rt.ip += 1;
        dispatch_one(rt, next_xt);
    }
}

fn dispatch_one(rt: &mut ForthRuntime, xt: usize) {
    rt.w = xt;
    let idx = rt.kernel.get(xt) as usize;
    let prim = *rt.kernel.primitive(idx);
    (prim.func)(rt);
}

/// `NUMBER`/`NUMBERIN`'s algorithm: accumulate digits in `base` until one
/// doesn't fit, then stop; an out-of-range base is a silent no-op, matching
/// the reference rather than raising an error spec doesn't ask for.
pub fn parse_number(bytes: &[u8], base: i64) -> (i64, usize) {
    if !(2..=36).contains(&base) {
        return (0, bytes.len());
    }
    let mut idx = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        idx += 1;
    }
    let mut value: i64 = 0;
    let mut consumed = idx;
    while consumed < bytes.len() {
        let digit = match bytes[consumed] {
            c @ b'0'..=b'9' => (c - b'0') as i64,
            c @ b'a'..=b'z' => (c - b'a') as i64 + 10,
            c @ b'A'..=b'Z' => (c - b'A') as i64 + 10,
            _ => break,
        };
        if digit >= base {
            break;
        }
        value = value * base + digit;
        consumed += 1;
    }
    if negative {
        value = -value;
    }
    (value, bytes.len() - consumed)
}

/// Reads one token and either executes it, compiles it, or tries to parse it
/// as a number. Returns `false` at end of input (`QUIT`'s cue to stop).
pub fn interpret_token(rt: &mut ForthRuntime) -> bool {
    let (addr, len) = rt.word();
    if len == 0 {
        return false;
    }
    let text = String::from_utf8_lossy(rt.kernel.string_slice(addr, len)).into_owned();

    if let Some(lfa) = rt.find(&text) {
        let cfa = rt.to_cfa(lfa);
        let immediate = rt.flags(lfa).is_immediate();
        if rt.is_compiling() && !immediate {
            rt.comma(cfa as i64);
        } else {
            rt.call(cfa);
        }
        return true;
    }

    let base = rt.base();
    let bytes = text.as_bytes();
    let (value, unparsed) = parse_number(bytes, base);
    if unparsed == 0 {
        if rt.is_compiling() {
            let lit_xt = rt.lit_xt();
            rt.comma(lit_xt as i64);
            rt.comma(value);
        } else {
            rt.kernel.push(value);
        }
    } else {
        print!("{text} ?");
        println!();
    }
    true
}

pub fn interpret_line(rt: &mut ForthRuntime, line: &str) {
    rt.input.load_line(line);
    while interpret_token(rt) {}
    rt.input.unload_line();
}

pub fn quit(rt: &mut ForthRuntime) {
    rt.kernel.set_return_ptr(RET_START);
    while !rt.halted {
        if !interpret_token(rt) {
            rt.halted = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booted() -> ForthRuntime {
        let mut rt = ForthRuntime::new();
        rt.cold_start();
        rt
    }

    #[test]
    fn docol_lit_and_exit_drive_a_compiled_word() {
        // SPACE is built at bootstrap as a real colon definition: DOCOL,
        // LIT 32, EMIT, EXIT. Calling it should print one space and return
        // cleanly, leaving the stack untouched.
        let mut rt = booted();
        let space_lfa = rt.find("SPACE").expect("SPACE must be linked");
        let depth_before = rt.kernel.stack_len();
        rt.call(rt.to_cfa(space_lfa));
        assert_eq!(rt.kernel.stack_len(), depth_before);
    }

    #[test]
    fn branch_and_zbranch_skip_or_take_the_jump() {
        let mut rt = booted();
        // A hand-assembled colon word: LIT 0  0BRANCH +3  LIT 111  BRANCH +2  LIT 222  EXIT
        // Flag 0 takes the 0BRANCH, landing on LIT 222 and skipping LIT 111.
        let lfa = rt.create("TESTBR");
        rt.comma(rt.docol_index() as i64);
        let lit_xt = rt.lit_xt() as i64;
        let exit_xt = rt.exit_xt() as i64;
        let zbranch_xt = rt.to_cfa(rt.find("0BRANCH").unwrap()) as i64;
        let branch_xt = rt.to_cfa(rt.find("BRANCH").unwrap()) as i64;

        rt.comma(lit_xt);
        rt.comma(0);
        rt.comma(zbranch_xt);
        let zbranch_operand = rt.here();
        rt.comma(0); // patched below
        rt.comma(lit_xt);
        rt.comma(111);
        rt.comma(branch_xt);
        let branch_operand = rt.here();
        rt.comma(0); // patched below
        let landing = rt.here();
        rt.comma(lit_xt);
        rt.comma(222);
        rt.comma(exit_xt);
        let end = rt.here();

        rt.kernel.set(zbranch_operand, (landing as i64) - (zbranch_operand as i64));
        rt.kernel.set(branch_operand, (end as i64) - (branch_operand as i64));

        rt.call(rt.to_cfa(lfa));
        assert_eq!(rt.kernel.pop(), 222);
        assert_eq!(rt.kernel.stack_len(), 0);
    }

    #[test]
    fn colon_and_semicolon_define_a_callable_word() {
        let mut rt = booted();
        rt.interpret_line(": DOUBLE DUP + ;");
        assert!(rt.find("DOUBLE").is_some());
        rt.kernel.push(21);
        let xt = rt.to_cfa(rt.find("DOUBLE").unwrap());
        rt.call(xt);
        assert_eq!(rt.kernel.pop(), 42);
    }

    #[test]
    fn interpreting_an_unknown_token_reports_and_continues() {
        let mut rt = booted();
        rt.interpret_line("3 4 + bogus-word-xyz 5");
        // "+": consumed 3 4 and left 7; bogus token reported; 5 still pushed
        assert_eq!(rt.kernel.pop(), 5);
        assert_eq!(rt.kernel.pop(), 7);
    }

    #[test]
    fn number_parses_per_base() {
        assert_eq!(parse_number(b"101", 2), (5, 0));
        assert_eq!(parse_number(b"-7", 10), (-7, 0));
        assert_eq!(parse_number(b"ff", 16), (255, 0));
        assert_eq!(parse_number(b"12x", 10), (12, 1));
    }

    #[test]
    fn find_respects_case_sensitivity_end_to_end() {
        let mut rt = booted();
        rt.interpret_line(": foo 1 ;");
        assert!(rt.find("foo").is_some());
        rt.set_case_sensitive(true);
        assert!(rt.find("FOO").is_none());
        rt.set_case_sensitive(false);
        assert!(rt.find("FOO").is_some());
    }
}
