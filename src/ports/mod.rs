/// Ports module defining interfaces for hexagonal architecture
///
/// Only driven (outbound) ports exist: the CLI calls the use cases
/// directly, and the use cases reach infrastructure through these traits.
pub mod outbound;
