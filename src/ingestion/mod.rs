//! Ingestion domain: value objects, pure services and scoring policies.
//!
//! Nothing in this module performs I/O; network and storage access goes
//! through the ports in [`crate::ports`].

pub mod domain;
pub mod policies;
pub mod services;
