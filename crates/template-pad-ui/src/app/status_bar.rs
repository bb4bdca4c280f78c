//! Status bar rendering: caret position, character count, variables in use,
//! last save time, and the latest status message.

use eframe::egui;
use egui::RichText;
use template_pad_core::highlight::variable_names;

use super::App;

/// Formats a character count, abbreviating above a thousand.
fn format_char_count(count: usize) -> String {
    if count < 1_000 {
        format!("{count}")
    } else if count < 1_000_000 {
        format!("~{:.1}K", count as f64 / 1_000.0)
    } else {
        format!("~{:.1}M", count as f64 / 1_000_000.0)
    }
}

/// Formats a store timestamp (epoch millis) in local time.
fn format_saved_time(updated_at_ms: i64) -> Option<String> {
    let utc = chrono::DateTime::from_timestamp_millis(updated_at_ms)?;
    Some(
        utc.with_timezone(&chrono::Local)
            .format("%Y-%m-%d @ %H:%M:%S")
            .to_string(),
    )
}

/// "Variables: a, b (1 unknown)" style summary.
fn variables_summary(names: &[String], unknown: usize) -> String {
    if names.is_empty() {
        return "No variables".to_string();
    }
    let mut text = format!("Variables: {}", names.join(", "));
    if unknown > 0 {
        text.push_str(&format!(" ({unknown} unknown)"));
    }
    text
}

impl App {
    /// Renders the status bar at the bottom of the application window.
    pub(crate) fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        let editor = &self.editor.editor;
        let (line, col) = editor.caret_line_col();
        let offset = editor.caret();
        let char_count = editor.len_chars();
        let names = variable_names(&editor.value());
        let unknown = names
            .iter()
            .filter(|name| !editor.catalog().contains(name))
            .count();
        let saved_at = self
            .selected_id
            .as_deref()
            .and_then(|id| self.templates.iter().find(|t| t.id == id))
            .and_then(|t| format_saved_time(t.updated_at_ms));

        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(format!("Ln {}, Col {} ({offset})", line + 1, col + 1))
                    .selectable(false),
            );
            ui.separator();
            ui.add(
                egui::Label::new(format!("{} chars", format_char_count(char_count)))
                    .selectable(false),
            );
            ui.separator();
            let summary = variables_summary(&names, unknown);
            let summary = if unknown > 0 {
                RichText::new(summary).color(self.theme.unknown_variable)
            } else {
                RichText::new(summary)
            };
            ui.add(egui::Label::new(summary).selectable(false));

            if let Some(name) = &self.last_committed {
                ui.separator();
                ui.add(egui::Label::new(format!("Inserted {{{{{name}}}}}")).selectable(false));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(saved_at) = &saved_at {
                    ui.add(egui::Label::new(format!("Saved {saved_at}")).selectable(false));
                }
                if let Some(message) = &self.status_message {
                    ui.separator();
                    ui.add(egui::Label::new(RichText::new(message).italics()).selectable(false));
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_char_count() {
        assert_eq!(format_char_count(0), "0");
        assert_eq!(format_char_count(999), "999");
        assert_eq!(format_char_count(1_500), "~1.5K");
        assert_eq!(format_char_count(2_000_000), "~2.0M");
    }

    #[test]
    fn test_variables_summary() {
        assert_eq!(variables_summary(&[], 0), "No variables");
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(variables_summary(&names, 0), "Variables: a, b");
        assert_eq!(variables_summary(&names, 1), "Variables: a, b (1 unknown)");
    }

    #[test]
    fn test_format_saved_time() {
        assert!(format_saved_time(1_700_000_000_000).is_some());
        assert!(format_saved_time(i64::MAX).is_none());
    }
}
