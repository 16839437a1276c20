pub mod frame;
pub mod surface;

pub use frame::{FrameSummary, RenderConfig, render_frame};
pub use surface::{CanvasPoint, DrawCommand, RecordingSurface, Surface};
