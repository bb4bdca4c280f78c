pub mod app;
pub mod editor;

pub use app::{App, StartupArgs};
pub use editor::{EditorState, EditorTheme, TemplateEditorWidget};
