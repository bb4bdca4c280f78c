//! Top-level application tying together the template list, toolbar, editor,
//! and status bar.

mod status_bar;
mod template_list;
mod toolbar;

use std::path::PathBuf;

use anyhow::{bail, Result};
use eframe::egui;

use template_pad_config::{
    load_catalog, Channel, EditorConfig, MessageTemplate, TemplateStore, STORE_FILE_NAME,
};
use template_pad_core::EditorEvent;

use crate::editor::{EditorState, EditorTheme, TemplateEditorWidget};

/// Name given to a template before the user renames it.
pub const UNTITLED: &str = "Untitled";

/// Arguments passed from the command line to the application.
#[derive(Debug, Clone, Default)]
pub struct StartupArgs {
    /// Open this stored template on startup.
    pub template_id: Option<String>,
    /// Start a new template with this body.
    pub seed: Option<String>,
    /// Catalog file; overrides the configured one.
    pub catalog: Option<PathBuf>,
    /// Config file; defaults to `template-pad.json` next to the executable.
    pub config_path: Option<PathBuf>,
    /// Directory holding the template store.
    pub data_dir: Option<PathBuf>,
}

/// The main application state.
pub struct App {
    pub editor: EditorState,
    pub theme: EditorTheme,
    pub config: EditorConfig,
    pub store: Option<TemplateStore>,
    /// Stored templates, as last listed.
    pub templates: Vec<MessageTemplate>,
    /// Template being edited; `None` for one not saved yet.
    pub selected_id: Option<String>,
    pub draft_name: String,
    pub draft_channel: Channel,
    /// Unsaved changes in the editor or the name field.
    pub dirty: bool,
    /// Last variable picked through autocomplete.
    pub last_committed: Option<String>,
    /// Message shown in the status bar (save results, errors).
    pub status_message: Option<String>,
}

impl App {
    /// Creates a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>, args: StartupArgs) -> Self {
        let config_path = args
            .config_path
            .clone()
            .unwrap_or_else(EditorConfig::config_path);
        let config = EditorConfig::load_or_create(&config_path);

        let theme = EditorTheme::from_palette(&config.palette, config.font_size);
        Self::apply_visuals(&cc.egui_ctx, &theme);

        let store_path = args
            .data_dir
            .as_ref()
            .map(|dir| dir.join(STORE_FILE_NAME))
            .unwrap_or_else(EditorConfig::store_path);
        let store = match TemplateStore::open(&store_path) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!("Failed to open template store, templates won't be saved: {e:#}");
                None
            }
        };

        Self::with_store(config, store, args)
    }

    /// Builds the app from already-loaded parts.
    pub fn with_store(config: EditorConfig, store: Option<TemplateStore>, args: StartupArgs) -> Self {
        let catalog_path = args.catalog.clone().or_else(|| config.catalog_file());
        let catalog = load_catalog(catalog_path.as_deref());
        let seed = args.seed.clone().unwrap_or_default();
        let editor = EditorState::new(catalog, config.editor_options(), &seed);
        let theme = EditorTheme::from_palette(&config.palette, config.font_size);

        let mut app = Self {
            editor,
            theme,
            config,
            store,
            templates: Vec::new(),
            selected_id: None,
            draft_name: UNTITLED.to_string(),
            draft_channel: Channel::default(),
            dirty: !seed.is_empty(),
            last_committed: None,
            status_message: None,
        };
        app.reload_templates();

        if let Some(id) = args.template_id.as_deref() {
            if !app.select_template(id) {
                tracing::warn!("Template '{id}' not found, starting a new one");
                app.status_message = Some(format!("Template not found: {id}"));
            }
        }
        app
    }

    fn apply_visuals(ctx: &egui::Context, theme: &EditorTheme) {
        let mut visuals = if theme.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        let widget_rounding = egui::CornerRadius::same(4);
        visuals.widgets.noninteractive.corner_radius = widget_rounding;
        visuals.widgets.inactive.corner_radius = widget_rounding;
        visuals.widgets.hovered.corner_radius = widget_rounding;
        visuals.widgets.active.corner_radius = widget_rounding;
        visuals.extreme_bg_color = theme.status_bar_bg;
        ctx.set_visuals(visuals);
    }

    /// Re-reads the template list from the store.
    pub fn reload_templates(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        match store.list() {
            Ok(templates) => self.templates = templates,
            Err(e) => {
                tracing::warn!("Failed to list templates: {e:#}");
                self.status_message = Some(format!("Failed to list templates: {e}"));
            }
        }
    }

    /// Starts a fresh, unsaved template.
    pub fn new_template(&mut self) {
        self.selected_id = None;
        self.draft_name = UNTITLED.to_string();
        self.draft_channel = Channel::default();
        self.editor.set_value("");
        self.editor.request_focus();
        self.dirty = false;
        self.status_message = None;
    }

    /// Loads a stored template into the editor. Returns false if `id` is not
    /// in the list.
    pub fn select_template(&mut self, id: &str) -> bool {
        let Some(template) = self.templates.iter().find(|t| t.id == id).cloned() else {
            return false;
        };
        self.selected_id = Some(template.id);
        self.draft_name = template.name;
        self.draft_channel = template.channel;
        self.editor.set_value(&template.body);
        self.editor.request_focus();
        self.dirty = false;
        self.status_message = None;
        true
    }

    /// Writes the current template to the store, creating it on first save.
    pub fn save_current(&mut self) -> Result<()> {
        let Some(store) = &self.store else {
            bail!("Template store is unavailable");
        };
        let body = self.editor.value();
        let saved = match self.selected_id.as_deref() {
            Some(id) => store.update(id, &self.draft_name, &body)?,
            None => store.create(&self.draft_name, self.draft_channel, &body)?,
        };
        self.selected_id = Some(saved.id.clone());
        self.draft_name = saved.name;
        self.dirty = false;
        self.reload_templates();
        Ok(())
    }

    /// Deletes the selected template and starts a new one.
    pub fn delete_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_id.clone() else {
            return Ok(());
        };
        let Some(store) = &self.store else {
            bail!("Template store is unavailable");
        };
        store.delete(&id)?;
        self.reload_templates();
        self.new_template();
        Ok(())
    }

    /// Saves and reports the result in the status bar.
    pub(crate) fn save_and_report(&mut self) {
        match self.save_current() {
            Ok(()) => {
                self.status_message = Some(format!("Saved \"{}\"", self.draft_name));
            }
            Err(e) => {
                tracing::warn!("Failed to save template: {e:#}");
                self.status_message = Some(format!("Save failed: {e}"));
            }
        }
    }

    pub(crate) fn delete_and_report(&mut self) {
        if let Err(e) = self.delete_selected() {
            tracing::warn!("Failed to delete template: {e:#}");
            self.status_message = Some(format!("Delete failed: {e}"));
        }
    }

    /// Applies the editor's pending events to the app state.
    fn process_editor_events(&mut self) {
        for event in self.editor.drain_events() {
            match event {
                EditorEvent::Changed(_) => self.dirty = true,
                EditorEvent::VariableCommitted(name) => {
                    tracing::debug!(variable = %name, "variable committed");
                    self.last_committed = Some(name);
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let save = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S));
        if save {
            self.save_and_report();
        }
        let new = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::N));
        if new {
            self.new_template();
        }
    }
}

impl eframe::App for App {
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        let panel_fill = ctx.style().visuals.panel_fill;
        let faint_bg = ctx.style().visuals.faint_bg_color;

        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::new()
                    .fill(panel_fill)
                    .inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                self.show_toolbar(ui);
            });

        egui::TopBottomPanel::bottom("status_bar")
            .max_height(24.0)
            .frame(
                egui::Frame::new()
                    .fill(self.theme.status_bar_bg)
                    .inner_margin(egui::Margin::symmetric(8, 3)),
            )
            .show(ctx, |ui| {
                self.show_status_bar(ui);
            });

        egui::SidePanel::left("template_list")
            .resizable(true)
            .default_width(200.0)
            .frame(
                egui::Frame::new()
                    .fill(faint_bg)
                    .inner_margin(egui::Margin::symmetric(6, 6)),
            )
            .show(ctx, |ui| {
                self.show_template_list(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(self.theme.bg_color))
            .show(ctx, |ui| {
                TemplateEditorWidget::new(&mut self.editor, &self.theme)
                    .max_visible_candidates(self.config.max_visible_candidates)
                    .show(ui);
            });

        self.process_editor_events();
    }
}
