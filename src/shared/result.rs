/// Result alias for adapter and service plumbing.
///
/// Use cases convert these errors into [`crate::shared::error::GateError`]
/// at their boundary.
pub type Result<T> = anyhow::Result<T>;
