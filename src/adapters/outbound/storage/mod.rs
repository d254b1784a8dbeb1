/// Storage adapters backed by the local filesystem
mod file_blob_store;
mod file_metadata_store;

pub use file_blob_store::FileBlobStore;
pub use file_metadata_store::FileMetadataStore;

/// Maps an arbitrary key to a single safe file name
///
/// Percent-encoding removes path separators and a leading dot is escaped,
/// so a key can never address anything outside its directory.
fn key_to_file_name(key: &str) -> String {
    let encoded = urlencoding::encode(key).into_owned();
    if encoded.starts_with('.') {
        format!("%2E{}", &encoded[1..])
    } else {
        encoded
    }
}
