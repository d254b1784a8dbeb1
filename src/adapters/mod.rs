/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports,
/// providing the actual integration with the npm registry, GitHub
/// and the local storage directory.
pub mod outbound;
