use crate::shared::Result;
use std::fs;
use std::path::{Component, Path};

/// Maximum accepted size for a package archive (200 MB)
/// Applies to uploaded content, downloaded tarballs, and repository archives
pub const MAX_ARCHIVE_SIZE: u64 = 200 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Arguments
/// * `path` - The path to validate
/// * `file_description` - Description of the file (e.g., "package archive") for error messages
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata: {}",
            file_description,
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Validates an archive payload size against a limit
///
/// # Arguments
/// * `size` - Payload size in bytes
/// * `description` - What the payload is (for error messages)
/// * `max_size` - Maximum allowed size in bytes
pub fn validate_archive_size(size: u64, description: &str, max_size: u64) -> Result<()> {
    if size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            description,
            size,
            max_size
        );
    }
    Ok(())
}

/// Validates a path component before it is interpolated into an API URL
///
/// Scoped npm names (`@scope/name`) are the only place a single `/` is legal,
/// so callers pass `allow_scope = true` for package names.
pub fn validate_url_component(
    component: &str,
    component_type: &str,
    allow_scope: bool,
) -> Result<()> {
    if component.is_empty() {
        anyhow::bail!("{} must not be empty", component_type);
    }

    let slash_count = component.matches('/').count();
    let scoped = allow_scope && component.starts_with('@') && slash_count == 1;
    if slash_count > 0 && !scoped {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }

    if component.contains('\\') {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }

    if component.contains("..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    Ok(())
}

/// Validates an entry path read from an untrusted archive
///
/// Rejects absolute paths and parent-directory traversal so that an entry can
/// never escape the directory it is extracted into.
pub fn validate_archive_entry_path(entry_path: &Path) -> Result<()> {
    for component in entry_path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                anyhow::bail!(
                    "Security: archive entry {} escapes its root directory",
                    entry_path.display()
                );
            }
            Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!(
                    "Security: archive entry {} is an absolute path",
                    entry_path.display()
                );
            }
        }
    }
    Ok(())
}
