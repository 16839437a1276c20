pub mod announcer;
pub mod schedule;
pub mod source;
pub mod wire;

pub use announcer::{AnnounceSink, Announcer, DEFAULT_ANNOUNCE_INTERVAL};
pub use schedule::{StopSignal, TaskHandle, spawn_repeating};
pub use source::{FixedViewport, ViewportSource};
