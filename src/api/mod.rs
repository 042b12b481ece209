pub mod download;
pub mod palettes;
pub mod process;

pub use download::{handle_download, __path_handle_download};
pub use palettes::{handle_palettes, PaletteInfo, __path_handle_palettes};
pub use process::{handle_process, ProcessForm, ProcessResponse, ProcessedVideo, __path_handle_process};
