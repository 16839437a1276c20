//! One render step: the local marker at the centre, every other peer at
//! `centre + vector` with a short line pointing its way.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, AnchorConfig};
use crate::peers::PeerTable;

use super::surface::{CanvasPoint, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side of the square canvas.
    pub canvas_size: f32,
    pub marker_radius: f32,
    pub indicator_length: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_size: 200.0,
            marker_radius: 5.0,
            indicator_length: 50.0,
        }
    }
}

impl RenderConfig {
    pub fn center(&self) -> CanvasPoint {
        CanvasPoint::new(self.canvas_size / 2.0, self.canvas_size / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSummary {
    pub drawn: usize,
    pub skipped: usize,
}

pub fn render_frame(
    table: &PeerTable,
    anchor: &AnchorConfig,
    config: &RenderConfig,
    surface: &mut dyn Surface,
) -> FrameSummary {
    surface.clear(config.canvas_size, config.canvas_size);

    let mut summary = FrameSummary::default();
    let center = config.center();
    let local = table.local_identity();

    for id in table.ids() {
        if id == local {
            surface.fill_circle(center, config.marker_radius);
            summary.drawn += 1;
            continue;
        }

        let vector = match table.vector_to(anchor, &id) {
            Ok(vector) => vector,
            Err(err) if err.is_not_yet_known() => {
                summary.skipped += 1;
                continue;
            }
            Err(err) => {
                log::warn!("Skipping peer {id}: {err}");
                summary.skipped += 1;
                continue;
            }
        };

        let marker = CanvasPoint::new(
            center.x + vector.dx as f32,
            center.y + vector.dy as f32,
        );
        surface.fill_circle(marker, config.marker_radius);

        let (ux, uy) = geometry::bearing(vector).unit();
        let tip = CanvasPoint::new(
            center.x + ux as f32 * config.indicator_length,
            center.y + uy as f32 * config.indicator_length,
        );
        surface.line(center, tip);
        summary.drawn += 1;
    }

    summary
}
