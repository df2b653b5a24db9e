use std::rc::Rc;

use types::Error;

use crate::registry::{BoxId, BoxState, Runtime};

impl Runtime {
    /// Initialize box `id`. Idempotent: returns immediately when the box is
    /// already Initialized.
    ///
    /// Otherwise runs the load hook (no-op by default), then invokes the
    /// box's post-init entry (export slot 0) with its import table, through
    /// the checkpoint machinery so that an abort during post-init comes back
    /// as the returned error. Any failure leaves the box Unloaded and
    /// propagates.
    pub fn init(&mut self, id: BoxId) -> Result<(), Error> {
        if self.record(id).state == BoxState::Initialized {
            return Ok(());
        }

        // load the box if unloaded
        {
            let record = self.record_mut(id);
            if let Some(load) = record.loader.as_mut() {
                load()?;
            }
        }

        if self.verbose {
            println!("{} ({}): loaded, running post-init", id, self.record(id).name);
        }

        // call box's post-init with its import table
        let imports = Rc::clone(&self.record(id).imports);
        let status = self.with_checkpoint(id, |env| {
            // SAFETY: the runtime is live for the whole crossing and this
            // thread is the only thread of control; see `Env`.
            let record = unsafe { &mut *env.runtime_ptr() }.record_mut(id);
            record.exports.invoke_postinit(env, imports)
        });
        if status != 0 {
            return Err(Error::from_word(status).unwrap_or(Error::General));
        }

        self.record_mut(id).state = BoxState::Initialized;
        Ok(())
    }

    /// Mark box `id` as needing to be re-initialized. Runs no box code and
    /// always succeeds.
    pub fn clobber(&mut self, id: BoxId) {
        if self.verbose {
            println!("{} ({}): clobbered", id, self.record(id).name);
        }
        self.record_mut(id).state = BoxState::Unloaded;
    }
}
