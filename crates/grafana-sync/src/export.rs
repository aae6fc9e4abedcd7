use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::catalog;
use crate::envelope::wrap_datasource;
use crate::layout::{self, DASHBOARDS_DIR, DATASOURCES_DIR};
use crate::remote::{Remote, RemoteError};

/// Errors that abort an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Whether a layout directory had to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Created,
    Reused,
}

/// Files written by a completed export.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub dashboards: Vec<PathBuf>,
    pub datasources: Vec<PathBuf>,
}

/// Create `base/dashboards` and `base/datasources` if they are missing.
pub fn ensure_layout(base: &Path) -> Result<Vec<(PathBuf, DirectoryStatus)>, ExportError> {
    let mut statuses = Vec::with_capacity(2);

    for name in [DASHBOARDS_DIR, DATASOURCES_DIR] {
        let dir = base.join(name);
        let status = if dir.is_dir() {
            info!("Reusing directory {}", dir.display());
            DirectoryStatus::Reused
        } else {
            std::fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
                path: dir.clone(),
                source,
            })?;
            info!("Created directory {}", dir.display());
            DirectoryStatus::Created
        };
        statuses.push((dir, status));
    }

    Ok(statuses)
}

/// Write `value` as 2-space indented JSON, replacing any existing file.
pub fn save_json(path: &Path, value: &Value) -> Result<(), ExportError> {
    debug!("Saving {}", path.display());

    let mut text = serde_json::to_string_pretty(value).map_err(|source| ExportError::Serialize {
        path: path.to_owned(),
        source,
    })?;
    text.push('\n');

    std::fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Export every dashboard and datasource on `remote` into `target`.
///
/// Fails fast: the first remote or filesystem error aborts the run, and
/// files already written stay on disk.
pub async fn export(remote: &dyn Remote, target: &Path) -> Result<ExportReport, ExportError> {
    ensure_layout(target)?;

    let mut report = ExportReport::default();

    for item in catalog::dashboards(remote).await? {
        let document = remote.fetch(&format!("/api/dashboards/{}", item.uri)).await?;
        let path = layout::dashboard_path(target, &item.uri);
        save_json(&path, &document)?;
        report.dashboards.push(path);
    }

    for item in catalog::datasources(remote).await? {
        let path = layout::datasource_path(target, &item.name);
        save_json(&path, &wrap_datasource(&item))?;
        report.datasources.push(path);
    }

    info!(
        "Exported {} dashboards and {} datasources from {}",
        report.dashboards.len(),
        report.datasources.len(),
        remote.label()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::{DATASOURCES_PATH, SEARCH_PATH};
    use crate::test_support::InMemoryRemote;

    fn remote_with_one_dashboard() -> InMemoryRemote {
        let mut remote = InMemoryRemote::new("test");
        remote.respond(
            SEARCH_PATH,
            json!([{"type": "dash-db", "title": "My Dash", "uri": "db/my-dash"}]),
        );
        remote.respond(
            "/api/dashboards/db/my-dash",
            json!({
                "meta": {"type": "db", "slug": "my-dash"},
                "dashboard": {"id": 1, "uid": "u1", "title": "My Dash"}
            }),
        );
        remote.respond(DATASOURCES_PATH, json!([]));
        remote
    }

    #[tokio::test]
    async fn single_dashboard_export_layout() {
        let temp = TempDir::new().unwrap();
        let remote = remote_with_one_dashboard();

        let report = export(&remote, temp.path()).await.unwrap();

        let expected = temp.path().join("dashboards/db_my-dash.json");
        assert_eq!(report.dashboards, vec![expected.clone()]);
        assert!(report.datasources.is_empty());
        assert!(expected.is_file());

        let datasources_dir = temp.path().join("datasources");
        assert!(datasources_dir.is_dir());
        assert_eq!(std::fs::read_dir(&datasources_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn dashboard_document_is_written_verbatim() {
        let temp = TempDir::new().unwrap();
        let remote = remote_with_one_dashboard();

        export(&remote, temp.path()).await.unwrap();

        let text = std::fs::read_to_string(temp.path().join("dashboards/db_my-dash.json")).unwrap();
        let written: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(written["meta"]["type"], "db");
        assert_eq!(written["dashboard"]["uid"], "u1");
        assert!(text.contains("\n  \"meta\": {"));
    }

    #[tokio::test]
    async fn datasources_are_wrapped() {
        let temp = TempDir::new().unwrap();
        let mut remote = InMemoryRemote::new("test");
        remote.respond(SEARCH_PATH, json!([]));
        remote.respond(
            DATASOURCES_PATH,
            json!([{"id": 2, "type": "loki", "name": "logs/loki", "url": "http://loki"}]),
        );

        let report = export(&remote, temp.path()).await.unwrap();
        assert!(report.dashboards.is_empty());
        assert_eq!(report.datasources.len(), 1);

        let path = temp.path().join("datasources/logs_loki.json");
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["meta"], json!({"type": "datasource"}));
        assert_eq!(written["datasource"]["name"], "logs/loki");
        assert_eq!(written["datasource"]["url"], "http://loki");
    }

    #[tokio::test]
    async fn datasource_keys_keep_server_order() {
        let temp = TempDir::new().unwrap();
        let mut remote = InMemoryRemote::new("test");
        remote.respond(SEARCH_PATH, json!([]));
        remote.respond(
            DATASOURCES_PATH,
            json!([{"id": 1, "orgId": 1, "name": "prom", "type": "prometheus"}]),
        );

        export(&remote, temp.path()).await.unwrap();

        let text = std::fs::read_to_string(temp.path().join("datasources/prom.json")).unwrap();
        let id = text.find("\"id\"").unwrap();
        let org = text.find("\"orgId\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        let kind = text.find("\"type\": \"prometheus\"").unwrap();
        assert!(id < org && org < name && name < kind);
    }

    #[tokio::test]
    async fn existing_files_are_overwritten() {
        let temp = TempDir::new().unwrap();
        let stale = temp.path().join("dashboards/db_my-dash.json");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "stale content that is much longer than nothing").unwrap();

        export(&remote_with_one_dashboard(), temp.path()).await.unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&stale).unwrap()).unwrap();
        assert_eq!(written["dashboard"]["title"], "My Dash");
    }

    #[tokio::test]
    async fn failed_dashboard_fetch_aborts_export() {
        let temp = TempDir::new().unwrap();
        let mut remote = InMemoryRemote::new("test");
        remote.respond(
            SEARCH_PATH,
            json!([{"type": "dash-db", "title": "Gone", "uri": "db/gone"}]),
        );
        remote.respond(DATASOURCES_PATH, json!([]));

        let result = export(&remote, temp.path()).await;
        assert!(matches!(result, Err(ExportError::Remote(_))));
    }

    #[test]
    fn layout_is_created_then_reused() {
        let temp = TempDir::new().unwrap();

        let first = ensure_layout(temp.path()).unwrap();
        assert!(first.iter().all(|(_, s)| *s == DirectoryStatus::Created));

        let second = ensure_layout(temp.path()).unwrap();
        assert!(second.iter().all(|(_, s)| *s == DirectoryStatus::Reused));
    }
}
