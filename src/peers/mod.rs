pub mod eviction;
pub mod table;

pub use eviction::{EvictionPolicy, IdleTimeout, KeepForever};
pub use table::{PeerEntry, PeerTable, Upsert};
