use std::panic::panic_any;

use types::Word;

use crate::gate::Checkpoint;
use crate::registry::{BoxId, BoxState, Runtime};

/// Unwind payload carrying an abort to the gate frame that owns
/// `checkpoint`. Every other frame re-raises it untouched.
pub(crate) struct AbortSignal {
    pub(crate) box_id: BoxId,
    pub(crate) checkpoint: Checkpoint,
    pub(crate) code: Word,
}

/// Unwind payload for the unrecoverable class: an abort with no caller
/// context to resume. No gate translates it; under a `panic = "abort"`
/// deployment profile raising it is a process halt.
pub struct Halt {
    pub code: Word,
}

/// Escalate to a process-wide halt. Intentionally unrecoverable.
pub fn halt(code: Word) -> ! {
    panic_any(Halt { code })
}

impl Runtime {
    /// The abort channel: signal that box `id` cannot continue.
    ///
    /// Marks the box Unloaded, so the next call to any of its exports forces
    /// re-initialization, then transfers control non-locally to the box's
    /// most recent checkpoint carrying `code`. With no checkpoint installed
    /// (a fault outside any tracked crossing) the process halts instead,
    /// since there is no caller context to resume.
    ///
    /// Reached through import slot 0 from well-behaved box code, or called
    /// directly by the environment (e.g. a watchdog-driven trap).
    pub fn abort(&mut self, id: BoxId, code: Word) -> ! {
        let record = self.record_mut(id);
        record.state = BoxState::Unloaded;

        match record.checkpoint {
            Some(checkpoint) => {
                if self.verbose {
                    println!("{} ({}): abort, err {}", id, self.record(id).name, code);
                }
                panic_any(AbortSignal {
                    box_id: id,
                    checkpoint,
                    code,
                })
            }
            None => {
                eprintln!(
                    "{} ({}): abort with no checkpoint installed, halting (err {})",
                    id,
                    self.record(id).name,
                    code
                );
                halt(code)
            }
        }
    }
}
