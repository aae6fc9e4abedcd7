use std::io::Write;

use anyhow::Result;
use grafana_sync::{CatalogEntry, Remote, catalog};

/// Print every dashboard, datasource and alert channel, one per line.
pub async fn run(remote: &dyn Remote) -> Result<()> {
    let entries = catalog::entries(remote).await?;
    write_entries(&mut std::io::stdout().lock(), &entries)?;
    Ok(())
}

fn write_entries(out: &mut impl Write, entries: &[CatalogEntry]) -> std::io::Result<()> {
    for entry in entries {
        writeln!(out, "{entry}")?;
    }
    Ok(())
}
