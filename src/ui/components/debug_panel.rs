use crate::ui::state::{AppState, EventKind};

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Details");
    ui.separator();

    ui.label(format!("Identity: {}", state.session.local_identity()));
    ui.label(format!("Known peers: {}", state.session.table().len()));

    match &state.details {
        Some(details) => {
            ui.monospace(format!(
                "outer position : ({:.0}, {:.0})\n\
                 outer size     : {:.0} x {:.0}\n\
                 inner size     : {:.0} x {:.0}\n\
                 chrome offset  : {}",
                details.outer_pos.x,
                details.outer_pos.y,
                details.outer_size.x,
                details.outer_size.y,
                details.inner_size.x,
                details.inner_size.y,
                details.state.offset,
            ));
            if let Some(monitor) = details.monitor_size {
                ui.monospace(format!("monitor size   : {:.0} x {:.0}", monitor.x, monitor.y));
            }
        }
        None => {
            ui.label("Window position unavailable from this windowing backend");
        }
    }

    ui.separator();

    ui.label("Recent Events:");
    egui::ScrollArea::vertical()
        .max_height(200.0)
        .show(ui, |ui| {
            for event in state.debug_events.iter().rev().take(20) {
                let time_str = event.timestamp.format("%H:%M:%S");
                let color = match event.kind {
                    EventKind::LinkUp | EventKind::Discovered => egui::Color32::GREEN,
                    EventKind::LinkDown | EventKind::Evicted => egui::Color32::RED,
                    EventKind::Listening => egui::Color32::YELLOW,
                };

                ui.horizontal(|ui| {
                    ui.colored_label(color, format!("[{}]", time_str));
                    ui.label(&event.message);
                });
            }
        });
}
