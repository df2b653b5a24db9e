use runtime::{Env, ImportTable};
use types::Word;

use crate::fmt::{FmtArg, cbprintf};

/// Minimal stdout for box code, layered over the box's `write` import.
/// The exact behavior depends on the environment's sink; with none
/// configured, output links but goes nowhere.
pub fn printf(env: &mut Env, imports: &ImportTable, format: &str, args: &[FmtArg]) -> isize {
    fprintf(env, imports, 1, format, args)
}

pub fn eprintf(env: &mut Env, imports: &ImportTable, format: &str, args: &[FmtArg]) -> isize {
    fprintf(env, imports, 2, format, args)
}

pub fn fprintf(
    env: &mut Env,
    imports: &ImportTable,
    stream: Word,
    format: &str,
    args: &[FmtArg],
) -> isize {
    let mut write = |stream: Word, buf: &[u8]| imports.write(env, stream, buf);
    cbprintf(&mut write, stream, format, args)
}

pub fn fflush(env: &mut Env, imports: &ImportTable, stream: Word) -> Word {
    imports.flush(env, stream)
}
