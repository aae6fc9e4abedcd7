pub mod catalog;
pub mod envelope;
pub mod export;
pub mod import;
pub mod layout;
pub mod remote;

pub use catalog::{
    AlertChannelSummary, CatalogEntry, DashboardSummary, DatasourceSummary, ResourceKind,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeKind};
pub use export::{ExportError, ExportReport, export};
pub use import::{FileImportError, FileOutcome, ImportOptions, ImportReport, SkipReason, import};
pub use layout::resource_file_name;
pub use remote::{Remote, RemoteError, SubmitOutcome};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
