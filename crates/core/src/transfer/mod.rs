//! Moving prompt data in and out of the engine through files and the
//! clipboard.

pub mod envelope;
pub mod io;
pub mod manager;

pub use envelope::{ExportFormat, ExportInfo, TemplateEnvelope, export_filename, template_envelope};
pub use io::{Clipboard, LocalFiles, MemoryClipboard, TextFiles};
pub use manager::ImportExportManager;
