//! The primitive catalogue: one Rust function per native word, registered
//! into `Kernel`'s primitive table at start-up. A dictionary entry's code
//! field is nothing more than an index into this table (see `dictionary.rs`)
//! so the inner interpreter's entire dispatch is "fetch the index, call the
//! function at it".
//!
//! Structural codewords (DOCOL, DODOES, EXIT, BRANCH, 0BRANCH, LIT,
//! LITSTRING, CONST, CONST-STRING, VAR) live in this same table as ordinary
//! primitives: nothing distinguishes them from DROP or `+` except what their
//! bodies do with `rt.ip`/`rt.w`/the return stack.

use crate::runtime::ForthRuntime;

pub type PrimFn = fn(&mut ForthRuntime);

#[derive(Clone, Copy)]
pub struct Primitive {
    pub name: &'static str,
    pub func: PrimFn,
    pub doc: &'static str,
    pub immediate: bool,
}

/// Every (name, function, doc, immediate) tuple that gets registered and
/// bootstrapped into the dictionary by `ForthRuntime::cold_start`. Order
/// matches the reference's `DEF_CODE`/`DEF_NATIVE` chain in `tomoko.c`,
/// preserved so `WORDS` output reads the same way.
pub fn catalogue() -> Vec<(&'static str, PrimFn, &'static str, bool)> {
    vec![
        // --- structural codewords ---
        ("EXIT", p_exit, "( R: a -- ) pop the return stack into IP", false),
        ("BRANCH", p_branch, "( -- ) unconditional inline jump", false),
        ("0BRANCH", p_zbranch, "( flag -- ) jump if flag is zero", false),
        ("LIT", p_lit, "( -- n ) push the inline literal following LIT", false),
        ("LITSTRING", p_litstring, "( -- addr len ) push the inline counted string following LITSTRING", false),
        ("DOCOL", p_docol, "enter a colon definition's parameter field", false),
        ("DODOES", p_dodoes, "enter a DOES> behaviour with the defining word's data", false),
        ("(CONST)", p_const, "( -- n ) push this word's stored constant", false),
        ("(CONST$)", p_const_string, "( -- addr len ) push this word's stored string", false),
        ("(VAR)", p_var, "( -- addr ) push this word's data-field address", false),
        // --- interpreter state ---
        ("[", p_lbrac, "( -- ) switch to interpret state", true),
        ("]", p_rbrac, "( -- ) switch to compile state", false),
        ("EXECUTE", p_execute, "( xt -- ) execute the word at xt", false),
        ("'", p_tick, "( -- xt ) push the xt of the next word in the input", false),
        ("IP@", p_ip_fetch, "( -- ip ) push the current instruction pointer", false),
        ("HALT", p_halt, "( -- ) stop the inner interpreter", false),
        ("SYSCALL0", p_syscall_stub, "not implemented", false),
        ("SYSCALL1", p_syscall_stub, "not implemented", false),
        ("SYSCALL2", p_syscall_stub, "not implemented", false),
        ("SYSCALL3", p_syscall_stub, "not implemented", false),
        ("FIND", p_find, "( addr len -- lfa|0 ) search the dictionary", false),
        // --- stack ---
        ("DROP", p_drop, "( a -- )", false),
        ("SWAP", p_swap, "( a b -- b a )", false),
        ("DUP", p_dup, "( a -- a a )", false),
        ("PICK", p_pick, "( ... n -- ... a ) copy the nth item down", false),
        ("STICK", p_stick, "( a ... n -- ... a ) bury a at depth n", false),
        ("NTUCK", p_ntuck, "( a ... n -- a ... a ) copy top under n items", false),
        ("OVER", p_over, "( a b -- a b a )", false),
        ("ROT", p_rot, "( a b c -- c a b ) names intentionally swapped from standard ANS Forth", false),
        ("-ROT", p_nrot, "( a b c -- b c a ) names intentionally swapped from standard ANS Forth", false),
        ("2DROP", p_2drop, "( a b -- )", false),
        ("2DUP", p_2dup, "( a b -- a b a b )", false),
        ("2SWAP", p_2swap, "( a b c d -- c d a b )", false),
        ("?DUP", p_qdup, "( a -- a a | 0 )", false),
        ("DSP@", p_dspfetch, "( -- a ) push the parameter stack pointer", false),
        ("DSP!", p_dspstore, "( a -- ) set the parameter stack pointer", false),
        (">R", p_to_r, "( a -- ) ( R: -- a )", false),
        ("R>", p_r_from, "( -- a ) ( R: a -- )", false),
        ("RSP@", p_rspfetch, "( -- a ) push the return stack pointer", false),
        ("RSP!", p_rspstore, "( a -- ) set the return stack pointer", false),
        ("RDROP", p_rdrop, "( R: a -- )", false),
        // --- arithmetic ---
        ("1+", p_incr, "( a -- a+1 )", false),
        ("1-", p_decr, "( a -- a-1 )", false),
        ("CELL+", p_cellplus, "( a -- a+1 )", false),
        ("CELL-", p_cellminus, "( a -- a-1 )", false),
        ("+", p_add, "( a b -- a+b )", false),
        ("-", p_sub, "( a b -- a-b )", false),
        ("*", p_mul, "( a b -- a*b )", false),
        ("/", p_div, "( a b -- a/b )", false),
        ("MOD", p_mod, "( a b -- a%b )", false),
        ("NEGATE", p_negate, "( a -- -a )", false),
        ("/MOD", p_divmod, "( a b -- a%b a/b )", false),
        // --- comparison ---
        ("=", p_eq, "( a b -- flag )", false),
        ("<>", p_ne, "( a b -- flag )", false),
        ("<", p_lt, "( a b -- flag )", false),
        (">", p_gt, "( a b -- flag )", false),
        ("<=", p_le, "( a b -- flag )", false),
        (">=", p_ge, "( a b -- flag )", false),
        ("0=", p_zeq, "( a -- flag )", false),
        ("0<>", p_zne, "( a -- flag )", false),
        ("0<", p_zlt, "( a -- flag )", false),
        ("0>", p_zgt, "( a -- flag )", false),
        ("0<=", p_zle, "( a -- flag )", false),
        ("0>=", p_zge, "( a -- flag )", false),
        // --- bitwise ---
        ("AND", p_and, "( a b -- a&b )", false),
        ("OR", p_or, "( a b -- a|b )", false),
        ("XOR", p_xor, "( a b -- a^b )", false),
        ("INVERT", p_invert, "( a -- ~a )", false),
        // --- memory ---
        ("!", p_store, "( val addr -- )", false),
        ("@", p_fetch, "( addr -- val )", false),
        ("+!", p_plus_store, "( val addr -- )", false),
        ("-!", p_minus_store, "( val addr -- )", false),
        ("C!", p_cstore, "( val addr -- )", false),
        ("C@", p_cfetch, "( addr -- val )", false),
        ("C@C!", p_cfetch_cstore, "( src dst -- src+1 dst+1 )", false),
        ("CMOVE", p_cmove, "( src dst len -- )", false),
        ("FILL", p_fill, "( addr len byte -- )", false),
        // --- input ---
        ("WS?", p_is_whitespace, "( ch -- flag )", false),
        ("KEY", p_key, "( -- ch )", false),
        ("WORD", p_word, "( -- addr len )", false),
        (">NUMBERIN", p_to_numberin, "( addr len base -- n unparsed-len )", false),
        ("NUMBERIN", p_numberin, "( addr len base -- n unparsed-len )", false),
        ("INIT", p_init, "( -- ) load $HOME/.tomoko", false),
        ("SOURCE", p_source, "( addr len -- ) push a named file as the active input source", false),
        ("ENDSOURCE", p_endsource, "( -- ) pop the current file source", false),
        // --- output ---
        ("EMIT", p_emit, "( ch -- )", false),
        ("TELL", p_tell, "( addr len -- )", false),
        (".", p_dot, "( n -- ) print in decimal", false),
        ("MSLEEP", p_msleep, "( ms -- )", false),
        // --- dictionary mutation ---
        ("CREATE", p_create, "( -- ) parse a name and link a new header", false),
        (",", p_comma, "( n -- ) compile n at HERE, advance HERE", false),
        ("C,", p_ccomma, "( n -- ) compile n at HERE, advance HERE", false),
        ("ALLOT", p_allot, "( n -- ) advance HERE by n cells", false),
        ("ERASE", p_erase, "( addr n -- ) zero n cells at addr", false),
        (">CFA", p_to_cfa, "( lfa -- cfa )", false),
        (">DFA", p_to_dfa, "( lfa -- dfa )", false),
        ("IMMEDIATE", p_immediate, "( -- ) toggle LATEST's immediate bit", true),
        ("HIDDEN", p_hidden, "( lfa -- ) toggle a word's hidden bit", false),
        ("HIDE", p_hide, "( -- ) hide the next word in the input", false),
        ("WORDS", p_words, "( -- ) list every visible word", false),
        // --- outer interpreter ---
        ("NUMBER", p_number, "( addr len -- n unparsed-len )", false),
        ("INTERPRET", p_interpret, "( -- ) interpret one token", false),
        ("QUIT", p_quit, "( -- ) reset the return stack and interpret forever", false),
        (":", p_colon, "( -- ) begin a colon definition", false),
        (";", p_semicolon, "( -- ) end a colon definition", true),
        ("CR", p_cr, "( -- ) emit a newline", false),
        ("CHAR", p_char, "( -- ch ) first character of the next word", false),
        ("SP#", p_spsharp, "( -- n ) parameter stack depth in cells", false),
        (".S", p_dot_s, "( -- ) print the parameter stack", false),
        ("\\", p_backslash, "( -- ) skip the rest of the input line", true),
        ("VERSION", p_version, "( -- n ) interpreter version, decimal-encoded", false),
        ("CELL", p_cell, "( -- 1 ) cells are the native unit here", false),
        ("BL", p_bl, "( -- 32 ) the space character", false),
    ]
}

// ---------------------------------------------------------------- structural

fn p_exit(rt: &mut ForthRuntime) {
    rt.ip = rt.kernel.r_pop() as usize;
}

fn p_branch(rt: &mut ForthRuntime) {
    let operand = rt.ip;
    let offset = rt.kernel.get(operand);
    rt.ip = (operand as i64 + offset) as usize;
}

fn p_zbranch(rt: &mut ForthRuntime) {
    let operand = rt.ip;
    let flag = rt.kernel.pop();
    if flag == 0 {
        let offset = rt.kernel.get(operand);
        rt.ip = (operand as i64 + offset) as usize;
    } else {
        rt.ip = operand + 1;
    }
}

fn p_lit(rt: &mut ForthRuntime) {
    let val = rt.kernel.get(rt.ip);
    rt.ip += 1;
    rt.kernel.push(val);
}

fn p_litstring(rt: &mut ForthRuntime) {
    let len = rt.kernel.get(rt.ip) as usize;
    let str_ptr = rt.kernel.get(rt.ip + 1) as usize;
    rt.ip += 2;
    rt.kernel.push(str_ptr as i64);
    rt.kernel.push(len as i64);
}

/// DOCOL: `rt.w` is the XT of the word being entered, whose code field holds
/// this primitive's own index; the parameter field starts one cell past it.
fn p_docol(rt: &mut ForthRuntime) {
    rt.kernel.r_push(rt.ip as i64);
    rt.ip = rt.w + 1;
}

/// DODOES: parameter field cell 0 holds the address of the DOES> behaviour
/// to run; cell 1 onward is the defining word's build data, whose address is
/// left on the stack for that behaviour to consume.
fn p_dodoes(rt: &mut ForthRuntime) {
    let ifa = rt.kernel.get(rt.w + 1) as usize;
    rt.kernel.push((rt.w + 2) as i64);
    rt.kernel.r_push(rt.ip as i64);
    rt.ip = ifa;
}

fn p_const(rt: &mut ForthRuntime) {
    rt.kernel.push(rt.kernel.get(rt.w + 1));
}

fn p_const_string(rt: &mut ForthRuntime) {
    let addr = rt.kernel.get(rt.w + 1) as usize;
    let len = rt.kernel.string_length(addr);
    rt.kernel.push((addr + 1) as i64);
    rt.kernel.push(len as i64);
}

fn p_var(rt: &mut ForthRuntime) {
    rt.kernel.push((rt.w + 1) as i64);
}

// ---------------------------------------------------------- interpreter state

fn p_lbrac(rt: &mut ForthRuntime) {
    rt.set_state(0);
}

fn p_rbrac(rt: &mut ForthRuntime) {
    rt.set_state(1);
}

fn p_execute(rt: &mut ForthRuntime) {
    let xt = rt.kernel.pop() as usize;
    rt.call(xt);
}

fn p_tick(rt: &mut ForthRuntime) {
    let (addr, len) = rt.word();
    let text = String::from_utf8_lossy(rt.kernel.string_slice(addr, len)).into_owned();
    match rt.find(&text) {
        Some(lfa) => rt.kernel.push(rt.to_cfa(lfa) as i64),
        None => rt.msg.error("'", "word not found", Some(text)),
    }
}

fn p_ip_fetch(rt: &mut ForthRuntime) {
    rt.kernel.push(rt.ip as i64);
}

fn p_halt(rt: &mut ForthRuntime) {
    rt.halted = true;
}

fn p_syscall_stub(rt: &mut ForthRuntime) {
    rt.msg.error("SYSCALL", "direct syscalls are not implemented", None::<&str>);
}

fn p_find(rt: &mut ForthRuntime) {
    let len = rt.kernel.pop() as usize;
    let addr = rt.kernel.pop() as usize;
    let text: String = rt
        .kernel
        .string_slice(addr, len)
        .iter()
        .map(|&b| b as char)
        .collect();
    match rt.find(&text) {
        Some(lfa) => rt.kernel.push(lfa as i64),
        None => rt.kernel.push(0),
    }
}

// ------------------------------------------------------------------- stack

fn p_drop(rt: &mut ForthRuntime) {
    rt.kernel.pop();
}

fn p_swap(rt: &mut ForthRuntime) {
    let a = rt.kernel.pop();
    let b = rt.kernel.pop();
    rt.kernel.push(a);
    rt.kernel.push(b);
}

fn p_dup(rt: &mut ForthRuntime) {
    rt.kernel.push(rt.kernel.top());
}

fn p_pick(rt: &mut ForthRuntime) {
    let n = rt.kernel.pop() as usize;
    rt.kernel.push(rt.kernel.peek(n));
}

fn p_stick(rt: &mut ForthRuntime) {
    let n = rt.kernel.pop() as usize;
    let a = rt.kernel.pop();
    let depth = rt.kernel.stack_ptr();
    rt.kernel.set(depth + n, a);
}

fn p_ntuck(rt: &mut ForthRuntime) {
    let n = rt.kernel.pop() as usize;
    let a = rt.kernel.top();
    let depth = rt.kernel.stack_ptr();
    rt.kernel.set(depth + n, a);
}

fn p_over(rt: &mut ForthRuntime) {
    rt.kernel.push(rt.kernel.peek(1));
}

/// Names intentionally swapped from standard ANS Forth: ROT here yields
/// (c,a,b), matching fn_ROT in the reference.
fn p_rot(rt: &mut ForthRuntime) {
    let c = rt.kernel.pop();
    let b = rt.kernel.pop();
    let a = rt.kernel.pop();
    rt.kernel.push(c);
    rt.kernel.push(a);
    rt.kernel.push(b);
}

/// Names intentionally swapped from standard ANS Forth: -ROT here yields
/// (b,c,a), matching fn_NROT in the reference.
fn p_nrot(rt: &mut ForthRuntime) {
    let c = rt.kernel.pop();
    let b = rt.kernel.pop();
    let a = rt.kernel.pop();
    rt.kernel.push(b);
    rt.kernel.push(c);
    rt.kernel.push(a);
}

fn p_2drop(rt: &mut ForthRuntime) {
    rt.kernel.pop();
    rt.kernel.pop();
}

fn p_2dup(rt: &mut ForthRuntime) {
    let b = rt.kernel.peek(0);
    let a = rt.kernel.peek(1);
    rt.kernel.push(a);
    rt.kernel.push(b);
}

fn p_2swap(rt: &mut ForthRuntime) {
    let d = rt.kernel.pop();
    let c = rt.kernel.pop();
    let b = rt.kernel.pop();
    let a = rt.kernel.pop();
    rt.kernel.push(c);
    rt.kernel.push(d);
    rt.kernel.push(a);
    rt.kernel.push(b);
}

fn p_qdup(rt: &mut ForthRuntime) {
    if rt.kernel.top() != 0 {
        rt.kernel.push(rt.kernel.top());
    }
}

fn p_dspfetch(rt: &mut ForthRuntime) {
    let sp = rt.kernel.stack_ptr();
    rt.kernel.push(sp as i64);
}

fn p_dspstore(rt: &mut ForthRuntime) {
    let a = rt.kernel.pop() as usize;
    rt.kernel.set_stack_ptr(a);
}

fn p_to_r(rt: &mut ForthRuntime) {
    let a = rt.kernel.pop();
    rt.kernel.r_push(a);
}

fn p_r_from(rt: &mut ForthRuntime) {
    let a = rt.kernel.r_pop();
    rt.kernel.push(a);
}

fn p_rspfetch(rt: &mut ForthRuntime) {
    let rp = rt.kernel.return_ptr();
    rt.kernel.push(rp as i64);
}

fn p_rspstore(rt: &mut ForthRuntime) {
    let a = rt.kernel.pop() as usize;
    rt.kernel.set_return_ptr(a);
}

fn p_rdrop(rt: &mut ForthRuntime) {
    rt.kernel.r_pop();
}

// -------------------------------------------------------------- arithmetic

fn p_incr(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| a + 1);
}

fn p_decr(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| a - 1);
}

fn p_cellplus(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| a + 1);
}

fn p_cellminus(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| a - 1);
}

fn p_add(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| a + b);
}

fn p_sub(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| a - b);
}

fn p_mul(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| a * b);
}

fn p_div(rt: &mut ForthRuntime) {
    let b = rt.kernel.pop();
    let a = rt.kernel.pop();
    if b == 0 {
        rt.msg.error("/", "division by zero", None::<&str>);
        rt.kernel.push(0);
        return;
    }
    rt.kernel.push(a / b);
}

fn p_mod(rt: &mut ForthRuntime) {
    let b = rt.kernel.pop();
    let a = rt.kernel.pop();
    if b == 0 {
        rt.msg.error("MOD", "division by zero", None::<&str>);
        rt.kernel.push(0);
        return;
    }
    rt.kernel.push(a % b);
}

fn p_negate(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| -a);
}

fn p_divmod(rt: &mut ForthRuntime) {
    let b = rt.kernel.pop();
    let a = rt.kernel.pop();
    if b == 0 {
        rt.msg.error("/MOD", "division by zero", None::<&str>);
        rt.kernel.push(0);
        rt.kernel.push(0);
        return;
    }
    rt.kernel.push(a % b);
    rt.kernel.push(a / b);
}

// -------------------------------------------------------------- comparison

const TRUE: i64 = -1;
const FALSE: i64 = 0;

fn flag(b: bool) -> i64 {
    if b {
        TRUE
    } else {
        FALSE
    }
}

fn p_eq(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| flag(a == b));
}

fn p_ne(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| flag(a != b));
}

fn p_lt(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| flag(a < b));
}

fn p_gt(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| flag(a > b));
}

fn p_le(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| flag(a <= b));
}

fn p_ge(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| flag(a >= b));
}

fn p_zeq(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| flag(a == 0));
}

fn p_zne(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| flag(a != 0));
}

fn p_zlt(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| flag(a < 0));
}

fn p_zgt(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| flag(a > 0));
}

fn p_zle(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| flag(a <= 0));
}

fn p_zge(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| flag(a >= 0));
}

// ---------------------------------------------------------------- bitwise

fn p_and(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| a & b);
}

fn p_or(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| a | b);
}

fn p_xor(rt: &mut ForthRuntime) {
    rt.kernel.pop2_push1(|a, b| a ^ b);
}

fn p_invert(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|a| !a);
}

// ----------------------------------------------------------------- memory

fn p_store(rt: &mut ForthRuntime) {
    let addr = rt.kernel.pop() as usize;
    let val = rt.kernel.pop();
    rt.kernel.set(addr, val);
}

fn p_fetch(rt: &mut ForthRuntime) {
    let addr = rt.kernel.pop() as usize;
    rt.kernel.push(rt.kernel.get(addr));
}

fn p_plus_store(rt: &mut ForthRuntime) {
    let addr = rt.kernel.pop() as usize;
    let val = rt.kernel.pop();
    rt.kernel.delta(addr, val);
}

/// Subtraction, not the reference's addition: spec flags `-!`'s reference
/// behaviour as almost certainly a bug, and this is a reimplementation.
fn p_minus_store(rt: &mut ForthRuntime) {
    let addr = rt.kernel.pop() as usize;
    let val = rt.kernel.pop();
    rt.kernel.delta(addr, -val);
}

fn p_cstore(rt: &mut ForthRuntime) {
    let addr = rt.kernel.pop() as usize;
    let val = rt.kernel.pop();
    rt.kernel.byte_set(addr, val as u8);
}

fn p_cfetch(rt: &mut ForthRuntime) {
    let addr = rt.kernel.pop() as usize;
    rt.kernel.push(rt.kernel.byte_get(addr) as i64);
}

fn p_cfetch_cstore(rt: &mut ForthRuntime) {
    let dst = rt.kernel.pop() as usize;
    let src = rt.kernel.pop() as usize;
    let b = rt.kernel.byte_get(src);
    rt.kernel.byte_set(dst, b);
    rt.kernel.push((src + 1) as i64);
    rt.kernel.push((dst + 1) as i64);
}

fn p_cmove(rt: &mut ForthRuntime) {
    let len = rt.kernel.pop() as usize;
    let dst = rt.kernel.pop() as usize;
    let src = rt.kernel.pop() as usize;
    for i in 0..len {
        let b = rt.kernel.byte_get(src + i);
        rt.kernel.byte_set(dst + i, b);
    }
}

fn p_fill(rt: &mut ForthRuntime) {
    let byte = rt.kernel.pop() as u8;
    let len = rt.kernel.pop() as usize;
    let addr = rt.kernel.pop() as usize;
    for i in 0..len {
        rt.kernel.byte_set(addr + i, byte);
    }
}

// ------------------------------------------------------------------- input

fn p_is_whitespace(rt: &mut ForthRuntime) {
    rt.kernel.pop1_push1(|ch| flag(ch == 32 || ch == 9 || ch == 10 || ch == 13));
}

fn p_key(rt: &mut ForthRuntime) {
    let prompt = rt.prompt.clone();
    match rt.input.key(&prompt) {
        Some(ch) => rt.kernel.push(ch as i64),
        None => rt.msg.fatal("KEY: no more input"),
    }
}

fn p_word(rt: &mut ForthRuntime) {
    let (addr, len) = rt.word();
    rt.kernel.push(addr as i64);
    rt.kernel.push(len as i64);
}

fn p_to_numberin(rt: &mut ForthRuntime) {
    do_numberin(rt);
}

fn p_numberin(rt: &mut ForthRuntime) {
    do_numberin(rt);
}

fn do_numberin(rt: &mut ForthRuntime) {
    let base = rt.kernel.pop();
    let len = rt.kernel.pop() as usize;
    let addr = rt.kernel.pop() as usize;
    let bytes = rt.kernel.string_slice(addr, len).to_vec();
    let (value, unparsed) = crate::interpreter::parse_number(&bytes, base);
    rt.kernel.push(value);
    rt.kernel.push(unparsed as i64);
}

fn p_init(rt: &mut ForthRuntime) {
    rt.load_init_file();
}

fn p_source(rt: &mut ForthRuntime) {
    let len = rt.kernel.pop() as usize;
    let addr = rt.kernel.pop() as usize;
    let path = String::from_utf8_lossy(rt.kernel.string_slice(addr, len)).into_owned();
    rt.input.source(&path, &rt.msg);
}

fn p_endsource(rt: &mut ForthRuntime) {
    rt.input.endsource();
}

// ------------------------------------------------------------------ output

fn p_emit(rt: &mut ForthRuntime) {
    let ch = rt.kernel.pop() as u8 as char;
    print!("{ch}");
}

fn p_tell(rt: &mut ForthRuntime) {
    let len = rt.kernel.pop() as usize;
    let addr = rt.kernel.pop() as usize;
    let bytes = rt.kernel.string_slice(addr, len);
    let text: String = bytes.iter().map(|&b| b as char).collect();
    print!("{text}");
}

fn p_dot(rt: &mut ForthRuntime) {
    let n = rt.kernel.pop();
    print!("{n} ");
}

fn p_msleep(rt: &mut ForthRuntime) {
    let ms = rt.kernel.pop();
    if ms > 0 {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

// ------------------------------------------------------- dictionary mutation

fn p_create(rt: &mut ForthRuntime) {
    let (addr, len) = rt.word();
    let name = String::from_utf8_lossy(rt.kernel.string_slice(addr, len)).into_owned();
    rt.create(&name);
}

fn p_comma(rt: &mut ForthRuntime) {
    let v = rt.kernel.pop();
    rt.comma(v);
}

fn p_ccomma(rt: &mut ForthRuntime) {
    let v = rt.kernel.pop();
    rt.ccomma(v);
}

fn p_allot(rt: &mut ForthRuntime) {
    let n = rt.kernel.pop();
    rt.allot(n);
}

fn p_erase(rt: &mut ForthRuntime) {
    let n = rt.kernel.pop() as usize;
    let addr = rt.kernel.pop() as usize;
    rt.erase(addr, n);
}

fn p_to_cfa(rt: &mut ForthRuntime) {
    let lfa = rt.kernel.pop() as usize;
    rt.kernel.push(if lfa == 0 { 0 } else { rt.to_cfa(lfa) as i64 });
}

fn p_to_dfa(rt: &mut ForthRuntime) {
    let lfa = rt.kernel.pop() as usize;
    rt.kernel.push(if lfa == 0 { 0 } else { rt.to_dfa(lfa) as i64 });
}

fn p_immediate(rt: &mut ForthRuntime) {
    let lfa = rt.latest();
    rt.toggle_immediate(lfa);
}

fn p_hidden(rt: &mut ForthRuntime) {
    let lfa = rt.kernel.pop() as usize;
    rt.toggle_hidden(lfa);
}

fn p_hide(rt: &mut ForthRuntime) {
    let (addr, len) = rt.word();
    let name = String::from_utf8_lossy(rt.kernel.string_slice(addr, len)).into_owned();
    match rt.find(&name) {
        Some(lfa) => rt.toggle_hidden(lfa),
        None => rt.msg.error("HIDE", "word not found", Some(name)),
    }
}

fn p_words(rt: &mut ForthRuntime) {
    for name in rt.words() {
        print!("{name} ");
    }
    println!();
}

// --------------------------------------------------------- outer interpreter

fn p_number(rt: &mut ForthRuntime) {
    let len = rt.kernel.pop() as usize;
    let addr = rt.kernel.pop() as usize;
    let base = rt.base();
    let bytes = rt.kernel.string_slice(addr, len).to_vec();
    let (value, unparsed) = crate::interpreter::parse_number(&bytes, base);
    rt.kernel.push(value);
    rt.kernel.push(unparsed as i64);
}

fn p_interpret(rt: &mut ForthRuntime) {
    crate::interpreter::interpret_token(rt);
}

fn p_quit(rt: &mut ForthRuntime) {
    rt.kernel.set_return_ptr(crate::kernel::RET_START);
    while !rt.halted {
        if !crate::interpreter::interpret_token(rt) {
            rt.halted = true;
        }
    }
}

fn p_colon(rt: &mut ForthRuntime) {
    let (addr, len) = rt.word();
    let name = String::from_utf8_lossy(rt.kernel.string_slice(addr, len)).into_owned();
    let lfa = rt.create(&name);
    let docol_index = rt.docol_index();
    rt.comma(docol_index as i64);
    rt.toggle_hidden(lfa);
    rt.set_state(1);
}

fn p_semicolon(rt: &mut ForthRuntime) {
    let exit = rt.exit_xt();
    rt.comma(exit as i64);
    let lfa = rt.latest();
    rt.toggle_hidden(lfa);
    rt.set_state(0);
}

fn p_cr(rt: &mut ForthRuntime) {
    let _ = rt;
    println!();
}

fn p_char(rt: &mut ForthRuntime) {
    let (addr, len) = rt.word();
    if len == 0 {
        rt.kernel.push(0);
    } else {
        rt.kernel.push(rt.kernel.byte_get(addr) as i64);
    }
}

fn p_spsharp(rt: &mut ForthRuntime) {
    let depth = rt.kernel.stack_len() as i64;
    rt.kernel.push(depth);
}

fn p_dot_s(rt: &mut ForthRuntime) {
    let depth = rt.kernel.stack_len();
    print!("<{depth}> ");
    for i in (0..depth).rev() {
        print!("{} ", rt.kernel.peek(i));
    }
    println!();
}

fn p_backslash(rt: &mut ForthRuntime) {
    let prompt = rt.prompt.clone();
    loop {
        match rt.input.key(&prompt) {
            Some(b'\n') | Some(b'\r') | None => break,
            Some(_) => continue,
        }
    }
}

fn p_version(rt: &mut ForthRuntime) {
    rt.kernel.push(crate::runtime::VERSION);
}

fn p_cell(rt: &mut ForthRuntime) {
    rt.kernel.push(1);
}

fn p_bl(rt: &mut ForthRuntime) {
    rt.kernel.push(32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ForthRuntime;

    #[test]
    fn arithmetic_primitives() {
        let mut rt = ForthRuntime::new();
        rt.kernel.push(3);
        rt.kernel.push(4);
        p_add(&mut rt);
        assert_eq!(rt.kernel.pop(), 7);
    }

    #[test]
    fn division_by_zero_reports_instead_of_panicking() {
        let mut rt = ForthRuntime::new();
        rt.kernel.push(1);
        rt.kernel.push(0);
        p_div(&mut rt);
        assert_eq!(rt.kernel.pop(), 0);
    }

    #[test]
    fn minus_store_subtracts() {
        let mut rt = ForthRuntime::new();
        rt.kernel.set(500, 10);
        rt.kernel.push(3);
        rt.kernel.push(500);
        p_minus_store(&mut rt);
        assert_eq!(rt.kernel.get(500), 7);
    }

    #[test]
    fn stack_shuffling_words() {
        // ROT and -ROT are intentionally swapped from standard ANS Forth:
        // a b c ROT leaves (c, a, b).
        let mut rt = ForthRuntime::new();
        rt.kernel.push(1);
        rt.kernel.push(2);
        rt.kernel.push(3);
        p_rot(&mut rt);
        assert_eq!(rt.kernel.pop(), 2);
        assert_eq!(rt.kernel.pop(), 1);
        assert_eq!(rt.kernel.pop(), 3);
    }

    #[test]
    fn comparison_words_use_forth_booleans() {
        let mut rt = ForthRuntime::new();
        rt.kernel.push(5);
        rt.kernel.push(5);
        p_eq(&mut rt);
        assert_eq!(rt.kernel.pop(), TRUE);
        rt.kernel.push(1);
        rt.kernel.push(2);
        p_eq(&mut rt);
        assert_eq!(rt.kernel.pop(), FALSE);
    }
}
