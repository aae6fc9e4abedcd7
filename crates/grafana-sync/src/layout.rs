use std::path::{Path, PathBuf};

pub const DASHBOARDS_DIR: &str = "dashboards";
pub const DATASOURCES_DIR: &str = "datasources";

/// Map a server identifier (a dashboard `uri` or a datasource `name`) to
/// the file name it is stored under.
///
/// Every `/` becomes `_` and `.json` is appended. The mapping is lossy:
/// `db/a_b` and `db_a/b` both land on `db_a_b.json`, and the later write
/// wins.
pub fn resource_file_name(identifier: &str) -> String {
    format!("{}.json", identifier.replace('/', "_"))
}

pub fn dashboard_path(base: &Path, uri: &str) -> PathBuf {
    base.join(DASHBOARDS_DIR).join(resource_file_name(uri))
}

pub fn datasource_path(base: &Path, name: &str) -> PathBuf {
    base.join(DATASOURCES_DIR).join(resource_file_name(name))
}

/// True if the importer should pick up this file.
pub fn is_envelope_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".json"))
}
