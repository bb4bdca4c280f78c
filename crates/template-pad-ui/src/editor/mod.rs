mod input;
mod layout;
mod state;
mod theme;
mod widget;

pub use layout::{token_name, TokenKind};
pub use state::EditorState;
pub use theme::EditorTheme;
pub use widget::TemplateEditorWidget;
