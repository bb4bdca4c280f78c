pub mod catalog_file;
pub mod color;
pub mod config;
pub mod palette;
pub mod store;

pub use catalog_file::{builtin_catalog, load_catalog};
pub use color::HexColor;
pub use config::{EditorConfig, STORE_FILE_NAME};
pub use palette::Palette;
pub use store::{Channel, MessageTemplate, TemplateStore};
