use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::FilteredView;
use super::model::{Dimension, EMISSION_COLUMN};

/// Write the rows of a view as CSV with the source table's headers.
/// Missing cells are written empty. The header is written even when the
/// view is empty.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    let header = Dimension::ALL.map(|d| d.column());
    writer
        .write_record(header.iter().copied().chain([EMISSION_COLUMN]))
        .context("writing header")?;
    for record in view.iter() {
        writer.serialize(record).context("serializing record")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export a view to a CSV file.
pub fn export_csv(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, file)?;
    log::info!("Exported {} rows to {}", view.len(), path.display());
    Ok(())
}
