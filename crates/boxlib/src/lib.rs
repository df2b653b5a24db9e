pub mod fmt;
pub mod stdio;

pub use fmt::{FmtArg, cbprintf};
pub use stdio::{eprintf, fflush, fprintf, printf};
