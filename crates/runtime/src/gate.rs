use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use types::{Error, ExportSlot, Word};

use crate::abort::AbortSignal;
use crate::registry::{BoxId, BoxState, Runtime};

/// A recovery point installed before a boundary crossing. Opaque token drawn
/// from the runtime's counter; tokens are unique for the life of the runtime,
/// so an abort payload can name exactly the gate frame it unwinds to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint(pub(crate) u64);

/// The current crossing, as seen from inside the box.
///
/// A fresh `Env` is created by the gate for every crossing and threaded
/// through the box's entries; boxes must not store it. It is the only route
/// back into the runtime from box code.
//
// Env holds a raw pointer to the runtime: the pointer is created from a
// live `&mut Runtime` at the gate, only dereferenced for the duration of a
// nested call, never stored past the crossing, and never shared across
// threads. Nested crossings therefore alias the runtime mutably; this is
// sound only under the single-thread, strictly-synchronous crossing model
// documented on `Runtime`.
pub struct Env {
    rt: *mut Runtime,
    id: BoxId,
}

impl Env {
    pub(crate) fn new(rt: *mut Runtime, id: BoxId) -> Self {
        Self { rt, id }
    }

    /// The box this crossing entered.
    pub fn box_id(&self) -> BoxId {
        self.id
    }

    /// Abort the current box. Non-local: unwinds to the nearest installed
    /// checkpoint, or halts the process if there is none.
    pub fn abort(&mut self, code: Word) -> ! {
        unsafe { &mut *self.rt }.abort(self.id, code)
    }

    /// Cross from inside this box into an export of another box, returning
    /// the raw wire result. Used by environment imports that relay calls
    /// between boxes.
    pub fn cross(&mut self, target: BoxId, slot: ExportSlot, args: &[Word]) -> Word {
        unsafe { &mut *self.rt }.call_raw(target, slot, args)
    }

    pub(crate) fn runtime_ptr(&self) -> *mut Runtime {
        self.rt
    }
}

impl Runtime {
    /// Call exported function `slot` of box `id`, through the call gate.
    ///
    /// Raw wire form: the result is the callee's word unchanged, or a
    /// negated error code. An error produced by the abort channel and one
    /// returned deliberately by the box are indistinguishable here, as is
    /// an export that legitimately returns a negative word; that is the
    /// ABI convention.
    pub fn call_raw(&mut self, id: BoxId, slot: ExportSlot, args: &[Word]) -> Word {
        if self.record(id).state == BoxState::Unloaded {
            if let Err(err) = self.init(id) {
                // no checkpoint was touched, no box code beyond post-init ran
                return err.to_word();
            }
        }

        if self.verbose {
            println!(
                "{} ({}): crossing {} args 0x{}",
                id,
                self.record(id).name,
                slot,
                hex::encode(words_to_bytes(args))
            );
        }

        self.with_checkpoint(id, |env| {
            // SAFETY: the runtime is live for the whole crossing and this
            // thread is the only thread of control; see `Env`.
            let rec = unsafe { &mut *env.runtime_ptr() }.record_mut(id);
            rec.exports.invoke(slot, env, args)
        })
    }

    /// Typed wrapper over `call_raw`: negative words become `Err`.
    pub fn call(&mut self, id: BoxId, slot: ExportSlot, args: &[Word]) -> Result<Word, Error> {
        let word = self.call_raw(id, slot, args);
        match Error::from_word(word) {
            Some(err) => Err(err),
            None => Ok(word),
        }
    }

    /// Run one crossing under a fresh checkpoint.
    ///
    /// Saves the box's current checkpoint, installs a new one, invokes `f`,
    /// and restores the saved value on every exit path. An abort carrying
    /// this frame's token is translated into an ordinary error-word return;
    /// any other unwind (another box's abort, a genuine bug) restores the
    /// bookkeeping and keeps unwinding.
    pub(crate) fn with_checkpoint<F>(&mut self, id: BoxId, f: F) -> Word
    where
        F: FnOnce(&mut Env) -> Word,
    {
        self.next_checkpoint += 1;
        let token = Checkpoint(self.next_checkpoint);
        let prev = self.record_mut(id).checkpoint.replace(token);

        let rt: *mut Runtime = self;
        let mut env = Env::new(rt, id);
        let outcome = catch_unwind(AssertUnwindSafe(|| f(&mut env)));

        let word = match outcome {
            Ok(word) => word,
            Err(payload) => match payload.downcast::<AbortSignal>() {
                Ok(signal) if signal.checkpoint == token => {
                    debug_assert_eq!(signal.box_id, id, "checkpoint token reused across boxes");
                    if self.verbose {
                        println!(
                            "{} ({}): abort unwound to gate, err {}",
                            id,
                            self.record(id).name,
                            signal.code
                        );
                    }
                    signal.code
                }
                // Some outer frame owns this abort (or it is not an abort at
                // all): restore our bookkeeping and let it keep unwinding.
                Ok(signal) => {
                    self.record_mut(id).checkpoint = prev;
                    resume_unwind(signal);
                }
                Err(other) => {
                    self.record_mut(id).checkpoint = prev;
                    resume_unwind(other);
                }
            },
        };

        self.record_mut(id).checkpoint = prev;
        word
    }
}

fn words_to_bytes(words: &[Word]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
