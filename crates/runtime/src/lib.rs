pub mod abort;
pub mod gate;
pub mod lifecycle;
pub mod registry;
pub mod sink;
pub mod stack;
pub mod tables;

pub use abort::{Halt, halt};
pub use gate::{Checkpoint, Env};
pub use registry::{BoxId, BoxSpec, BoxState, LoadHook, Runtime};
pub use sink::{BufferSink, ConsoleSink, NullSink, StreamSink};
pub use stack::DataStack;
pub use tables::{ExportFn, ExportTable, ImportFn, ImportTable, PostInitFn};
