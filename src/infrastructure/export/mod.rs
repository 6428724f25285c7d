mod local_export_store;

pub use local_export_store::{LocalExportStore, write_or_discard};
