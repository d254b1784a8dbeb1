use crate::shared::security::MAX_ARCHIVE_SIZE;
use crate::shared::Result;
use anyhow::Context;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

const SCRIPT_EXTENSIONS: [&str; 3] = [".js", ".mjs", ".cjs"];

/// Summary of a debloat pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebloatStats {
    pub minified_files: usize,
    pub copied_files: usize,
    pub original_size: usize,
    pub debloated_size: usize,
}

/// DebloatProcessor service for shrinking package archives
///
/// Script entries are minified in place; every other entry, and any script
/// that is not valid UTF-8, is copied through untouched. The manifest is
/// never rewritten.
pub struct DebloatProcessor;

impl DebloatProcessor {
    /// Best-effort debloat: returns the original bytes when the archive
    /// cannot be rebuilt
    pub fn debloat(archive: &[u8]) -> Vec<u8> {
        match Self::try_debloat(archive) {
            Ok((bytes, stats)) => {
                tracing::debug!(
                    minified = stats.minified_files,
                    copied = stats.copied_files,
                    before = stats.original_size,
                    after = stats.debloated_size,
                    "debloated package archive"
                );
                bytes
            }
            Err(e) => {
                tracing::warn!(error = %e, "debloat failed, keeping original archive");
                archive.to_vec()
            }
        }
    }

    /// Rebuilds the archive with minified scripts
    ///
    /// # Errors
    /// Returns an error if the input is not a zip file, the output cannot be
    /// written, or the decompressed scripts exceed `MAX_ARCHIVE_SIZE`
    pub fn try_debloat(archive: &[u8]) -> Result<(Vec<u8>, DebloatStats)> {
        Self::try_debloat_within(archive, MAX_ARCHIVE_SIZE)
    }

    /// Same as [`DebloatProcessor::try_debloat`] with an explicit bound on
    /// the bytes decompressed for minification
    pub fn try_debloat_within(archive: &[u8], max_unpacked: u64) -> Result<(Vec<u8>, DebloatStats)> {
        let mut input = zip::ZipArchive::new(Cursor::new(archive))
            .context("Package archive is not a readable zip file")?;
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut stats = DebloatStats {
            original_size: archive.len(),
            ..Default::default()
        };
        let mut budget = max_unpacked;

        for index in 0..input.len() {
            if let Some(minified) = Self::minify_entry(&mut input, index, &mut budget)? {
                let (name, text) = minified;
                writer
                    .start_file(name.clone(), options)
                    .with_context(|| format!("Failed to add {} to zip", name))?;
                writer.write_all(text.as_bytes())?;
                stats.minified_files += 1;
            } else {
                let entry = input.by_index_raw(index)?;
                writer
                    .raw_copy_file(entry)
                    .context("Failed to copy archive entry")?;
                stats.copied_files += 1;
            }
        }

        let bytes = writer
            .finish()
            .context("Failed to finalize zip archive")?
            .into_inner();
        stats.debloated_size = bytes.len();
        Ok((bytes, stats))
    }

    /// Returns the entry name and minified text for script entries that can
    /// be read as UTF-8, `None` for everything that should be copied raw.
    /// Decompressed bytes are charged against `budget`.
    fn minify_entry(
        input: &mut zip::ZipArchive<Cursor<&[u8]>>,
        index: usize,
        budget: &mut u64,
    ) -> Result<Option<(String, String)>> {
        let mut entry = input.by_index(index)?;
        if entry.is_dir() || !Self::is_script(entry.name()) {
            return Ok(None);
        }

        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        if let Err(e) = entry
            .by_ref()
            .take(budget.saturating_add(1))
            .read_to_end(&mut bytes)
        {
            tracing::debug!(entry = %name, error = %e, "unreadable script, copying unchanged");
            return Ok(None);
        }
        let read = bytes.len() as u64;
        if read > *budget {
            anyhow::bail!("Scripts decompress to more than the debloat limit (stopped at {})", name);
        }
        *budget -= read;
        let Ok(source) = String::from_utf8(bytes) else {
            tracing::debug!(entry = %name, "non-UTF-8 script, copying unchanged");
            return Ok(None);
        };

        Ok(Some((name, minifier::js::minify(&source).to_string())))
    }

    fn is_script(name: &str) -> bool {
        SCRIPT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }
}
