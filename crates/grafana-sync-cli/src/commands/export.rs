use std::path::Path;

use anyhow::{Context, Result};
use grafana_sync::Remote;

/// Export the server into `target` and report what was written.
pub async fn run(remote: &dyn Remote, target: &Path) -> Result<()> {
    let report = grafana_sync::export(remote, target)
        .await
        .with_context(|| format!("export to {} failed", target.display()))?;

    println!(
        "Exported {} dashboards and {} datasources to {}",
        report.dashboards.len(),
        report.datasources.len(),
        target.display()
    );

    Ok(())
}
