use crate::shared::security::{validate_archive_entry_path, MAX_ARCHIVE_SIZE};
use crate::shared::Result;
use anyhow::Context;
use flate2::read::GzDecoder;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tar::{Archive, EntryType};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// Directory npm wraps every published tarball in
const NPM_TARBALL_ROOT: &str = "package/";

/// TarballConverter service for turning npm `.tgz` tarballs into the
/// canonical zip form
pub struct TarballConverter;

impl TarballConverter {
    /// Converts gzipped tar bytes into zip bytes.
    ///
    /// Regular files are copied with the leading `package/` directory
    /// stripped; directories, links and special entries are skipped.
    ///
    /// # Errors
    /// Returns an error if the tarball is corrupt, an entry path would
    /// escape the archive root, or the unpacked files exceed
    /// `MAX_ARCHIVE_SIZE`.
    pub fn to_zip(tarball: &[u8]) -> Result<Vec<u8>> {
        Self::to_zip_within(tarball, MAX_ARCHIVE_SIZE)
    }

    /// Same as [`TarballConverter::to_zip`] with an explicit bound on the
    /// total unpacked size
    pub fn to_zip_within(tarball: &[u8], max_unpacked: u64) -> Result<Vec<u8>> {
        let mut archive = Archive::new(GzDecoder::new(tarball));
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut unpacked: u64 = 0;

        let entries = archive
            .entries()
            .context("Failed to read tarball entries")?;
        for entry in entries {
            let mut entry = entry.context("Failed to read tarball entry")?;
            if entry.header().entry_type() != EntryType::Regular {
                continue;
            }

            let raw_path = entry
                .path()
                .context("Tarball entry has an unreadable path")?
                .to_string_lossy()
                .into_owned();
            validate_archive_entry_path(Path::new(&raw_path))?;

            let relative = raw_path.trim_start_matches("./");
            let relative = relative.strip_prefix(NPM_TARBALL_ROOT).unwrap_or(relative);
            if relative.is_empty() {
                continue;
            }

            // Header sizes are untrusted; count the bytes actually read
            let remaining = max_unpacked.saturating_sub(unpacked);
            let mut contents = Vec::new();
            entry
                .by_ref()
                .take(remaining.saturating_add(1))
                .read_to_end(&mut contents)
                .with_context(|| format!("Failed to read {} from tarball", raw_path))?;
            unpacked += contents.len() as u64;
            if unpacked > max_unpacked {
                anyhow::bail!(
                    "Tarball unpacks to more than {} bytes (stopped at {})",
                    max_unpacked,
                    raw_path
                );
            }

            writer
                .start_file(relative.to_string(), options)
                .with_context(|| format!("Failed to add {} to zip", relative))?;
            writer.write_all(&contents)?;
        }

        let cursor = writer.finish().context("Failed to finalize zip archive")?;
        Ok(cursor.into_inner())
    }
}
