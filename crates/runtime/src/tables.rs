use std::rc::Rc;

use types::{ExportSlot, ImportSlot, Word};

use crate::gate::Env;

/// Export slot 0: the box's post-initialization entry. Receives the box's
/// import table as its sole argument; a non-zero return is a failure status.
pub type PostInitFn = Box<dyn FnMut(&mut Env, Rc<ImportTable>) -> Word>;

/// A declared export: raw word-level arguments in, one word out.
pub type ExportFn = Box<dyn FnMut(&mut Env, &[Word]) -> Word>;

/// An environment-specific import (slots 3..N of the import table).
pub type ImportFn = Rc<dyn Fn(&mut Env, &[Word]) -> Word>;

pub type AbortFn = Rc<dyn Fn(&mut Env, Word)>;
pub type WriteFn = Rc<dyn Fn(&mut Env, Word, &[u8]) -> isize>;
pub type FlushFn = Rc<dyn Fn(&mut Env, Word) -> Word>;

enum ExportEntry {
    PostInit(PostInitFn),
    Func(ExportFn),
}

/// Ordered table of the entries a box offers to its callers.
///
/// The layout is an ABI fixed at build time: slot 0 is always post-init,
/// slots 1..N are the declared exports in declaration order. The runtime
/// never inspects entries, it only indexes by slot number; indexing a slot
/// that does not exist (or the post-init slot through the ordinary path) is a
/// contract violation between stale table and stale caller, and panics.
pub struct ExportTable {
    slots: Vec<ExportEntry>,
}

impl ExportTable {
    pub fn new(postinit: PostInitFn) -> Self {
        Self {
            slots: vec![ExportEntry::PostInit(postinit)],
        }
    }

    /// Append the next declared export, returning its assigned slot.
    pub fn push(&mut self, func: ExportFn) -> ExportSlot {
        let slot = ExportSlot(self.slots.len());
        self.slots.push(ExportEntry::Func(func));
        slot
    }

    // slot 0 always exists, so a table is never empty
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn invoke(&mut self, slot: ExportSlot, env: &mut Env, args: &[Word]) -> Word {
        match self.slots.get_mut(slot.0) {
            Some(ExportEntry::Func(func)) => func(env, args),
            Some(ExportEntry::PostInit(_)) => {
                panic!("table layout mismatch: {slot} is the reserved post-init entry")
            }
            None => panic!(
                "table layout mismatch: {slot} out of range for table of {}",
                self.slots.len()
            ),
        }
    }

    pub(crate) fn invoke_postinit(&mut self, env: &mut Env, imports: Rc<ImportTable>) -> Word {
        match &mut self.slots[0] {
            ExportEntry::PostInit(func) => func(env, imports),
            ExportEntry::Func(_) => unreachable!("slot 0 is always post-init"),
        }
    }
}

enum ImportEntry {
    Abort(AbortFn),
    Write(WriteFn),
    Flush(FlushFn),
    Func(ImportFn),
}

/// Ordered table of the entries the environment offers into a box.
///
/// Slot 0 is the abort entry, slots 1..2 the minimal stdio shims, slots 3..N
/// environment-specific imports. Built once by the registry and handed to the
/// box at post-init time; the box holds it read-only for its lifetime.
pub struct ImportTable {
    slots: Vec<ImportEntry>,
}

impl ImportTable {
    pub(crate) fn new(
        abort: AbortFn,
        write: WriteFn,
        flush: FlushFn,
        extras: Vec<ImportFn>,
    ) -> Self {
        let mut slots = vec![
            ImportEntry::Abort(abort),
            ImportEntry::Write(write),
            ImportEntry::Flush(flush),
        ];
        slots.extend(extras.into_iter().map(ImportEntry::Func));
        Self { slots }
    }

    // slots 0..2 always exist, so a table is never empty
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Signal that the box cannot continue. Does not return: control
    /// transfers to the nearest installed checkpoint, or the process halts.
    pub fn abort(&self, env: &mut Env, code: Word) -> ! {
        match &self.slots[ImportSlot::ABORT.0] {
            ImportEntry::Abort(func) => {
                func(env, code);
                unreachable!("abort import returned")
            }
            _ => panic!("table layout mismatch: {} is not the abort entry", ImportSlot::ABORT),
        }
    }

    /// Minimal stdout: returns bytes written, or a negated error code.
    pub fn write(&self, env: &mut Env, stream: Word, buf: &[u8]) -> isize {
        match &self.slots[ImportSlot::WRITE.0] {
            ImportEntry::Write(func) => func(env, stream, buf),
            _ => panic!("table layout mismatch: {} is not the write entry", ImportSlot::WRITE),
        }
    }

    pub fn flush(&self, env: &mut Env, stream: Word) -> Word {
        match &self.slots[ImportSlot::FLUSH.0] {
            ImportEntry::Flush(func) => func(env, stream),
            _ => panic!("table layout mismatch: {} is not the flush entry", ImportSlot::FLUSH),
        }
    }

    /// Call an environment-specific import by its fixed slot number.
    pub fn call(&self, env: &mut Env, slot: ImportSlot, args: &[Word]) -> Word {
        match self.slots.get(slot.0) {
            Some(ImportEntry::Func(func)) => func(env, args),
            Some(_) => panic!("table layout mismatch: {slot} is a reserved entry"),
            None => panic!(
                "table layout mismatch: {slot} out of range for table of {}",
                self.slots.len()
            ),
        }
    }
}
