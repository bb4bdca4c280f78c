//! Side panel listing stored templates.

use eframe::egui;
use egui::RichText;

use super::App;

impl App {
    pub(crate) fn show_template_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Templates");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("+").on_hover_text("New template").clicked() {
                    self.new_template();
                }
            });
        });
        ui.separator();

        if self.store.is_none() {
            ui.label(RichText::new("Template store unavailable").italics());
            return;
        }
        if self.templates.is_empty() {
            ui.label(RichText::new("No saved templates").italics());
            return;
        }

        let mut clicked: Option<String> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for template in &self.templates {
                let selected = self.selected_id.as_deref() == Some(template.id.as_str());
                let title = if selected && self.dirty {
                    format!("{} *", template.name)
                } else {
                    template.name.clone()
                };
                let response = ui
                    .selectable_label(selected, title)
                    .on_hover_text(format!(
                        "{} · {} variable(s)",
                        template.channel.label(),
                        template.variables().len()
                    ));
                if response.clicked() && !selected {
                    clicked = Some(template.id.clone());
                }
            }
        });

        if let Some(id) = clicked {
            self.select_template(&id);
        }
    }
}
