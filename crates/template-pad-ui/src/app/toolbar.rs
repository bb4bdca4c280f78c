//! Toolbar: template name, channel, save/delete, and an insert-variable menu.

use eframe::egui;
use template_pad_config::Channel;

use super::App;

impl App {
    pub(crate) fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Name");
            let name_response =
                ui.add(egui::TextEdit::singleline(&mut self.draft_name).desired_width(220.0));
            if name_response.changed() {
                self.dirty = true;
            }

            // Channel is fixed once the template has been stored.
            let is_new = self.selected_id.is_none();
            ui.add_enabled_ui(is_new, |ui| {
                egui::ComboBox::from_id_salt("channel")
                    .selected_text(self.draft_channel.label())
                    .show_ui(ui, |ui| {
                        for channel in Channel::ALL {
                            ui.selectable_value(&mut self.draft_channel, channel, channel.label());
                        }
                    });
            });

            ui.separator();

            let save_label = if self.dirty { "Save *" } else { "Save" };
            if ui.button(save_label).clicked() {
                self.save_and_report();
            }
            if ui
                .add_enabled(!is_new, egui::Button::new("Delete"))
                .clicked()
            {
                self.delete_and_report();
            }

            ui.separator();

            ui.menu_button("Insert variable", |ui| {
                let candidates = self.editor.editor.catalog().candidates().to_vec();
                for candidate in candidates {
                    let response = ui.button(&candidate.name);
                    let response = if candidate.description.is_empty() {
                        response
                    } else {
                        response.on_hover_text(&candidate.description)
                    };
                    if response.clicked() {
                        let state = &mut self.editor;
                        state
                            .editor
                            .insert_variable(&candidate.name, &mut state.surface);
                        state.request_focus();
                        ui.close();
                    }
                }
            });
        });
    }
}
