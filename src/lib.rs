//! Peers that each own a window broadcast where that window sits and work out
//! where every other window is relative to their own.

pub mod common;
pub mod config;
pub mod error;
pub mod geometry;
pub mod network;
pub mod peers;
pub mod protocol;
pub mod render;
pub mod session;
pub mod simulate;
pub mod ui;

pub use common::{Identity, PeerMessage, PeerState};
pub use error::RadarError;
pub use session::PeerSession;
