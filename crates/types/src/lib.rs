pub mod abi;
pub mod error;

pub use abi::{ExportSlot, ImportSlot, Word};
pub use error::Error;
