use std::time::Instant;

use tokio::sync::{mpsc, watch};

use crate::common::{NetworkEvent, PeerState};
use crate::session::PeerSession;

use super::components::{debug_panel, radar, sidebar};
use super::state::{AppState, LocalDetails};

pub struct RadarApp {
    state: AppState,
    sample_sender: watch::Sender<Option<PeerState>>,
    event_receiver: mpsc::Receiver<NetworkEvent>,
}

impl RadarApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        session: PeerSession,
        sample_sender: watch::Sender<Option<PeerState>>,
        event_receiver: mpsc::Receiver<NetworkEvent>,
    ) -> Self {
        Self {
            state: AppState::new(session),
            sample_sender,
            event_receiver,
        }
    }

    /// Hands the current window geometry to the announcer.
    fn sample_viewport(&mut self, ctx: &egui::Context) {
        let info = ctx.input(|i| i.viewport().clone());
        let details = local_details(&info);
        self.sample_sender
            .send_replace(details.map(|details| details.state));
        self.state.details = details;
    }

    fn handle_network_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply_event(event, now);
        }
    }
}

impl eframe::App for RadarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sample_viewport(ctx);
        self.handle_network_events();
        self.state.evict(Instant::now());

        egui::SidePanel::left("peer_readouts")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                sidebar::render(ui, &self.state);
            });

        egui::SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                debug_panel::render(ui, &self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Window Radar");
            ui.separator();
            let frame = radar::render(ui, &self.state.session);
            if frame.skipped > 0 {
                ui.label(
                    egui::RichText::new(format!("{} peer(s) waiting for our position", frame.skipped))
                        .weak(),
                );
            }
        });

        ctx.request_repaint();
    }
}

/// Outer rectangle is the window including decorations; the chrome offset is
/// whatever the outer height adds on top of the content height. `None` when
/// the backend does not report both rectangles.
pub fn local_details(info: &egui::ViewportInfo) -> Option<LocalDetails> {
    let outer = info.outer_rect?;
    let inner = info.inner_rect?;

    let outer_height = outer.height().round().max(0.0) as u32;
    let inner_height = inner.height().round().max(0.0) as u32;

    let state = PeerState {
        x: outer.min.x.round() as i32,
        y: outer.min.y.round() as i32,
        width: outer.width().round().max(0.0) as u32,
        height: outer_height,
        offset: outer_height.saturating_sub(inner_height),
    };

    Some(LocalDetails {
        outer_pos: outer.min,
        outer_size: outer.size(),
        inner_size: inner.size(),
        monitor_size: info.monitor_size,
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
    }

    #[test]
    fn test_local_details_from_viewport() {
        let mut info = egui::ViewportInfo::default();
        info.outer_rect = Some(rect(500.0, -3.0, 300.0, 220.0));
        info.inner_rect = Some(rect(500.0, 17.0, 300.0, 200.0));
        info.monitor_size = Some(egui::vec2(1920.0, 1080.0));

        let details = local_details(&info).unwrap();
        assert_eq!(
            details.state,
            PeerState {
                x: 500,
                y: -3,
                width: 300,
                height: 220,
                offset: 20,
            }
        );
        assert_eq!(details.monitor_size, Some(egui::vec2(1920.0, 1080.0)));
    }

    #[test]
    fn test_local_details_needs_both_rects() {
        let mut info = egui::ViewportInfo::default();
        info.inner_rect = Some(rect(0.0, 0.0, 10.0, 10.0));
        assert!(local_details(&info).is_none());
    }

    #[test]
    fn test_inner_taller_than_outer_gives_zero_offset() {
        let mut info = egui::ViewportInfo::default();
        info.outer_rect = Some(rect(0.0, 0.0, 100.0, 100.0));
        info.inner_rect = Some(rect(0.0, 0.0, 100.0, 120.0));
        assert_eq!(local_details(&info).unwrap().state.offset, 0);
    }
}
