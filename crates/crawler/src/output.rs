//! Output artifact
//!
//! Hands the finished graph to downstream stages as a JSON array of paper
//! records, in discovery order.

use citetrail_common::errors::Result;
use citetrail_common::model::PaperDescriptor;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write the admitted papers to a JSON file.
pub fn write_graph(path: &Path, papers: &[PaperDescriptor]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, papers)?;
    writer.flush()?;

    info!(path = %path.display(), papers = papers.len(), "citation graph written");
    Ok(())
}
