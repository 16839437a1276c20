use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Other windows");
    ui.separator();

    if state.readouts.is_empty() {
        ui.label("No other windows yet");
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for readout in &state.readouts {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::GREEN, "●");
                ui.label(readout.id.to_string());
            });

            if let Ok(vector) = state
                .session
                .table()
                .vector_to(state.session.anchor(), &readout.id)
            {
                ui.label(
                    egui::RichText::new(format!("Δ ({}, {})", vector.dx, vector.dy)).weak(),
                );
            }
            ui.monospace(&readout.text);
            ui.separator();
        }
    });
}
