//! Operator commands beyond capture start/stop: capture-file upload,
//! export of stored packets, and clearing stored data.

pub mod clear;
pub mod export;
pub mod upload;

pub use clear::clear_data;
pub use export::{export_packets, ExportFormat, TransientBlob};
pub use upload::{upload_capture, FileInput};
