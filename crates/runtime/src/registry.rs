use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use types::Error;

use crate::gate::Checkpoint;
use crate::sink::{ConsoleSink, StreamSink};
use crate::stack::DataStack;
use crate::tables::{AbortFn, ExportTable, FlushFn, ImportFn, ImportTable, WriteFn};

/// Handle to a registered box. Only `Runtime::register` produces these.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoxId(pub(crate) usize);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoxState {
    Unloaded,
    Initialized,
}

/// Optional hook that prepares a box's image for execution. The default is a
/// no-op, meaning the image is statically resident.
pub type LoadHook = Box<dyn FnMut() -> Result<(), Error>>;

/// Everything the environment supplies when registering a box.
pub struct BoxSpec {
    pub(crate) name: String,
    pub(crate) exports: ExportTable,
    pub(crate) extra_imports: Vec<ImportFn>,
    pub(crate) loader: Option<LoadHook>,
    pub(crate) stack_bytes: Option<usize>,
}

impl BoxSpec {
    pub fn new(name: &str, exports: ExportTable) -> Self {
        Self {
            name: name.to_string(),
            exports,
            extra_imports: Vec::new(),
            loader: None,
            stack_bytes: None,
        }
    }

    /// Append an environment-specific import; slots are assigned in call
    /// order starting at `ImportSlot::EXTRA_BASE`.
    pub fn with_import(mut self, func: ImportFn) -> Self {
        self.extra_imports.push(func);
        self
    }

    pub fn with_loader(mut self, loader: LoadHook) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Give the box a data stack region of `bytes`. Without one the box runs
    /// the minimal profile: `stack_push` always fails safely.
    pub fn with_stack(mut self, bytes: usize) -> Self {
        self.stack_bytes = Some(bytes);
        self
    }
}

pub(crate) struct BoxRecord {
    pub(crate) name: String,
    pub(crate) state: BoxState,
    /// Innermost active recovery checkpoint. A single mutable slot: nested
    /// gate frames stack implicitly by saving and restoring it, so only the
    /// most recent checkpoint is ever reachable.
    pub(crate) checkpoint: Option<Checkpoint>,
    pub(crate) exports: ExportTable,
    pub(crate) imports: Rc<ImportTable>,
    pub(crate) loader: Option<LoadHook>,
    pub(crate) stack: Option<DataStack>,
}

/// The box registry: single authority over every box's bookkeeping state.
///
/// Designed for one thread of control with nested, strictly synchronous
/// crossings. Two simultaneous crossings into the same box would race on its
/// checkpoint slot and corrupt recovery state; the `Rc` internals keep the
/// whole runtime off other threads, and interrupt-style re-entry is the
/// caller's responsibility to exclude.
pub struct Runtime {
    pub(crate) boxes: Vec<BoxRecord>,
    pub(crate) sink: Rc<RefCell<dyn StreamSink>>,
    pub(crate) next_checkpoint: u64,
    /// Print boundary diagnostics (registration, crossings, aborts).
    pub verbose: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_sink(Rc::new(RefCell::new(ConsoleSink)))
    }

    /// Use a custom stream sink for the shared write/flush import entries.
    pub fn with_sink(sink: Rc<RefCell<dyn StreamSink>>) -> Self {
        Self {
            boxes: Vec::new(),
            sink,
            next_checkpoint: 0,
            verbose: false,
        }
    }

    /// Construct a box record. Tables are fixed from here on; the box starts
    /// Unloaded and is initialized lazily on its first crossing.
    pub fn register(&mut self, spec: BoxSpec) -> BoxId {
        let id = BoxId(self.boxes.len());

        // Import slots 0..2 are wired by the runtime itself: abort into the
        // abort channel, write/flush onto the one sink shared by every box.
        let abort: AbortFn = Rc::new(move |env, code| env.abort(code));
        let sink = Rc::clone(&self.sink);
        let write: WriteFn = Rc::new(move |_env, stream, buf| sink.borrow_mut().write(stream, buf));
        let sink = Rc::clone(&self.sink);
        let flush: FlushFn = Rc::new(move |_env, stream| sink.borrow_mut().flush(stream));
        let imports = Rc::new(ImportTable::new(abort, write, flush, spec.extra_imports));

        if self.verbose {
            println!(
                "{} ({}): registered, {} exports, {} imports",
                id,
                spec.name,
                spec.exports.len(),
                imports.len()
            );
        }

        self.boxes.push(BoxRecord {
            name: spec.name,
            state: BoxState::Unloaded,
            checkpoint: None,
            exports: spec.exports,
            imports,
            loader: spec.loader,
            stack: spec.stack_bytes.map(DataStack::new),
        });
        id
    }

    pub fn state(&self, id: BoxId) -> BoxState {
        self.record(id).state
    }

    pub fn name(&self, id: BoxId) -> &str {
        &self.record(id).name
    }

    /// The box's current innermost checkpoint, if a crossing is active.
    pub fn active_checkpoint(&self, id: BoxId) -> Option<Checkpoint> {
        self.record(id).checkpoint
    }

    pub(crate) fn record(&self, id: BoxId) -> &BoxRecord {
        self.boxes.get(id.0).expect("unknown box")
    }

    pub(crate) fn record_mut(&mut self, id: BoxId) -> &mut BoxRecord {
        self.boxes.get_mut(id.0).expect("unknown box")
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
