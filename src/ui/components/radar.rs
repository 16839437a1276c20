use crate::render::{CanvasPoint, FrameSummary, Surface};
use crate::session::PeerSession;

/// `Surface` over an egui painter; canvas origin at `origin`.
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    fn to_screen(&self, point: CanvasPoint) -> egui::Pos2 {
        self.origin + egui::vec2(point.x, point.y)
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self, width: f32, height: f32) {
        let rect = egui::Rect::from_min_size(self.origin, egui::vec2(width, height));
        self.painter
            .rect_filled(rect, egui::CornerRadius::ZERO, egui::Color32::WHITE);
    }

    fn fill_circle(&mut self, center: CanvasPoint, radius: f32) {
        self.painter
            .circle_filled(self.to_screen(center), radius, egui::Color32::BLACK);
    }

    fn line(&mut self, from: CanvasPoint, to: CanvasPoint) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        );
    }
}

pub fn render(ui: &mut egui::Ui, session: &PeerSession) -> FrameSummary {
    let size = session.render_config().canvas_size;
    let (response, painter) = ui.allocate_painter(egui::vec2(size, size), egui::Sense::hover());
    // peers far away land outside the canvas; keep them there
    let painter = painter.with_clip_rect(response.rect);

    let mut surface = PainterSurface::new(&painter, response.rect.min);
    session.render(&mut surface)
}
