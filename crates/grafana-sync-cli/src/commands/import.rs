use std::path::Path;

use anyhow::Result;
use grafana_sync::{ImportOptions, ImportReport, Remote};

/// Import every file under `source`. Per-file failures are logged and
/// summarized; they do not fail the command.
pub async fn run(remote: &dyn Remote, source: &Path, options: &ImportOptions) -> Result<()> {
    let report = grafana_sync::import(remote, source, options).await;
    println!("{}", summary(&report));

    for (path, error) in report.failures() {
        eprintln!("  {}: {error}", path.display());
    }

    Ok(())
}

fn summary(report: &ImportReport) -> String {
    let mut msg = format!(
        "Imported {} files ({} already existed, {} skipped)",
        report.imported(),
        report.already_existing(),
        report.skipped()
    );
    if report.failed() > 0 {
        msg.push_str(&format!(", {} failed", report.failed()));
    }
    msg
}
