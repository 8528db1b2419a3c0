//! Zip archive writing for the export bundle.

use std::io::{Cursor, Write};

use web_time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::bundle::ExportBundle;
use super::error::ExportError;
use crate::model::ImageEntry;

/// Build the export archive for a set of entries.
///
/// Produces a deflate-compressed zip with one top-level directory per
/// distinct label, each holding that label's images under their original
/// names. Unlabeled entries are excluded. The first failing read aborts the
/// whole build; since nothing here mutates the entries, the caller can retry
/// from unchanged state.
pub fn build_archive(entries: &[ImageEntry]) -> Result<Vec<u8>, ExportError> {
    let start = Instant::now();
    let bundle = ExportBundle::plan(entries);

    if bundle.is_empty() {
        log::warn!("📦 Export requested with no classified images; archive will be empty");
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for group in &bundle.groups {
        writer.add_directory(group.directory.as_str(), options)?;

        for file in &group.files {
            let entry = &entries[file.entry_index];
            let data = entry.source.read().map_err(|source| ExportError::SourceRead {
                name: entry.name.clone(),
                source,
            })?;

            writer.start_file(format!("{}/{}", group.directory, file.archive_name), options)?;
            writer.write_all(&data)?;
        }
    }

    let bytes = writer.finish()?.into_inner();
    log::info!(
        "📦 Built archive: {} files in {} labels, {} bytes in {:?}",
        bundle.file_count(),
        bundle.groups.len(),
        bytes.len(),
        start.elapsed()
    );
    Ok(bytes)
}
