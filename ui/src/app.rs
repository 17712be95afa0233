use crate::{state::State, widgets};

pub struct BackofficeApp {
    state: State,
}

impl BackofficeApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for BackofficeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.label("Back office");
                if ui.button("Account settings").clicked() {
                    self.state.open_credential_dialog();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Invoices");
            ui.add_space(8.0);

            if self.state.invoices.is_empty() {
                ui.label("No invoices loaded.");
                return;
            }

            egui::Grid::new("invoice_flags")
                .num_columns(4)
                .striped(true)
                .show(ui, |ui| {
                    for row in &mut self.state.invoices {
                        ui.label(row.id.as_str());
                        widgets::flag_toggle(ui, &mut row.checked);
                        widgets::flag_toggle(ui, &mut row.published);
                        widgets::flag_toggle(ui, &mut row.paid);
                        ui.end_row();
                    }
                });
        });

        let mut close_dialog = false;
        if let Some(controller) = self.state.dialog.as_mut() {
            let mut open = true;
            egui::Window::new("Change email and password")
                .open(&mut open)
                .collapsible(false)
                .show(ctx, |ui| {
                    widgets::credential_dialog(ui, controller);
                });
            close_dialog = !open;
        }
        if close_dialog {
            self.state.close_credential_dialog();
        }

        widgets::toast_area(ctx, &mut self.state.center);
    }
}
