#![allow(dead_code)]

use egui_kittest::Harness;
use tempfile::TempDir;
use template_pad_ui::{App, StartupArgs};

/// Startup args pointing config and store into `dir`.
pub fn isolated_args(dir: &TempDir) -> StartupArgs {
    StartupArgs {
        config_path: Some(dir.path().join("template-pad.json")),
        data_dir: Some(dir.path().join("data")),
        ..StartupArgs::default()
    }
}

/// Creates a harness with the app at 1024x768, isolated in a temp directory.
pub fn create_harness() -> (Harness<'static, App>, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let args = isolated_args(&dir);
    (create_harness_with(args), dir)
}

pub fn create_harness_with(args: StartupArgs) -> Harness<'static, App> {
    let mut harness = Harness::builder()
        .with_size(egui::Vec2::new(1024.0, 768.0))
        .build_eframe(move |cc| App::new(cc, args.clone()));
    // First frame hands keyboard focus to the editor.
    harness.run();
    harness
}

/// Types text into the focused editor, then runs one more frame so the
/// debounced render and the panels drawn before the editor catch up.
pub fn type_text(harness: &mut Harness<'static, App>, text: &str) {
    harness.event(egui::Event::Text(text.to_string()));
    harness.run();
    harness.run();
}
