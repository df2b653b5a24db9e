pub mod ping;

pub use ping::{PingClient, ping_box, relay_ping, sys_ping};
