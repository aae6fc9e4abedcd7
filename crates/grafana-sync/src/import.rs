use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::catalog::DATASOURCES_PATH;
use crate::envelope::{Envelope, EnvelopeError, EnvelopeKind};
use crate::layout::is_envelope_file;
use crate::remote::{Remote, RemoteError, SubmitOutcome};

pub const DASHBOARDS_DB_PATH: &str = "/api/dashboards/db";

/// Status the server uses for "dashboard already exists".
pub const DASHBOARD_CONFLICT_STATUS: u16 = 412;
/// Status the server uses for "datasource already exists".
pub const DATASOURCE_CONFLICT_STATUS: u16 = 409;

/// Import policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Treat the server's "already exists" answer as a skip instead of a
    /// failure. Existing resources are never overwritten.
    pub override_existing: bool,
    /// Create datasources as well. Off by default; datasource files are
    /// then reported as skipped.
    pub import_datasources: bool,
}

/// Errors that fail a single file. None of them stop the batch.
#[derive(Debug, thiserror::Error)]
pub enum FileImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("could not walk directory: {0}")]
    Walk(String),
}

/// Why a file was deliberately left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DatasourceImportDisabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatasourceImportDisabled => write!(f, "datasource import is disabled"),
        }
    }
}

/// What happened to a file that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Imported(EnvelopeKind),
    /// The server already had it; overwriting is not implemented.
    AlreadyExists(EnvelopeKind),
    Skipped(SkipReason),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<FileOutcome, FileImportError>,
}

/// Per-file results of an import run, in walk order.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub files: Vec<FileReport>,
}

impl ImportReport {
    pub fn imported(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Imported(_)))
    }

    pub fn already_existing(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::AlreadyExists(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_err()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &FileImportError)> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f.path.as_path(), e)))
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files
            .iter()
            .filter(|f| f.result.as_ref().is_ok_and(&predicate))
            .count()
    }
}

/// Read one local file and re-create its resource on `remote`.
pub async fn import_file(
    remote: &dyn Remote,
    path: &Path,
    options: &ImportOptions,
) -> Result<FileOutcome, FileImportError> {
    info!("Processing file {}", path.display());

    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    let envelope = Envelope::from_value(value)?;
    let kind = envelope.kind();
    info!("file {} has a type {kind}", path.display());

    let (endpoint, conflict) = match kind {
        EnvelopeKind::Datasource if !options.import_datasources => {
            let reason = SkipReason::DatasourceImportDisabled;
            warn!("skipping {}: {reason}", path.display());
            return Ok(FileOutcome::Skipped(reason));
        }
        EnvelopeKind::Datasource => (DATASOURCES_PATH, DATASOURCE_CONFLICT_STATUS),
        EnvelopeKind::Dashboard => (DASHBOARDS_DB_PATH, DASHBOARD_CONFLICT_STATUS),
    };
    let conflict_status = options.override_existing.then_some(conflict);

    match remote
        .submit(endpoint, &envelope.into_submission(), conflict_status)
        .await?
    {
        SubmitOutcome::Created(_) => Ok(FileOutcome::Imported(kind)),
        SubmitOutcome::AlreadyExists => Ok(FileOutcome::AlreadyExists(kind)),
    }
}

/// Import every `.json` file below `source`, in file-name order.
///
/// Each file succeeds or fails on its own; failures are logged and
/// collected in the report and never abort the walk.
pub async fn import(remote: &dyn Remote, source: &Path, options: &ImportOptions) -> ImportReport {
    let mut report = ImportReport::default();

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(source).to_owned();
                error!("could not read {}: {e}", path.display());
                report.files.push(FileReport {
                    path,
                    result: Err(FileImportError::Walk(e.to_string())),
                });
                continue;
            }
        };

        // Symlinked files count; symlinked directories are not descended.
        if !entry.path().is_file() || !is_envelope_file(entry.path()) {
            continue;
        }

        let path = entry.into_path();
        let result = import_file(remote, &path, options).await;
        if let Err(e) = &result {
            error!("file {} could not be imported: {e}", path.display());
        }
        report.files.push(FileReport { path, result });
    }

    report
}
