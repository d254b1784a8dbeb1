use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow callers to distinguish a rejected package from a
/// malformed invocation or an infrastructure failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the package was ingested, or the query answered
    Success = 0,
    /// The package was rejected (duplicate ID or failed the quality gate)
    PackageRejected = 1,
    /// Invalid command-line arguments or request fields
    InvalidArguments = 2,
    /// Application error (network, storage, archive, I/O, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::PackageRejected => write!(f, "Package Rejected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Discriminant of [`GateError`], used where only the outcome class matters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    UnrecognizedSource,
    ResolutionFailed,
    MissingManifest,
    Conflict,
    Disqualified,
    PersistenceFailed,
    BlobStoreFailed,
    PackageNotFound,
}

/// Typed outcomes of the ingestion and query use cases.
///
/// Every failure a caller can act on has its own variant, so the transport
/// layer can map it to a response code without inspecting messages.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Invalid package request: {reason}\n\n💡 Hint: Provide a Name, the debloat flag and exactly one of Content or URL")]
    InvalidRequest { reason: String },

    #[error("Unrecognized package source: {url}\n\n💡 Hint: Use https://www.npmjs.com/package/<name> or https://github.com/<owner>/<repo>")]
    UnrecognizedSource { url: String },

    #[error("Failed to resolve package from {source_ref}\nDetails: {details}")]
    ResolutionFailed { source_ref: String, details: String },

    #[error("Package archive does not contain a package.json\n\n💡 Hint: Zip the package root so that package.json is included")]
    MissingManifest,

    #[error("Package {id} already exists")]
    Conflict { id: String },

    #[error("Package {id} was disqualified: {reason}")]
    Disqualified { id: String, reason: String },

    #[error("Failed to persist metadata for {id}\nDetails: {details}\n\n💡 Hint: Nothing was stored; resubmit the package")]
    PersistenceFailed { id: String, details: String },

    #[error("Metadata for {id} was stored but the archive upload failed\nDetails: {details}\n\n💡 Hint: The record now exists without its archive; remove it before resubmitting")]
    BlobStoreFailed { id: String, details: String },

    #[error("Package {id} does not exist")]
    PackageNotFound { id: String },
}

impl GateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            GateError::UnrecognizedSource { .. } => ErrorKind::UnrecognizedSource,
            GateError::ResolutionFailed { .. } => ErrorKind::ResolutionFailed,
            GateError::MissingManifest => ErrorKind::MissingManifest,
            GateError::Conflict { .. } => ErrorKind::Conflict,
            GateError::Disqualified { .. } => ErrorKind::Disqualified,
            GateError::PersistenceFailed { .. } => ErrorKind::PersistenceFailed,
            GateError::BlobStoreFailed { .. } => ErrorKind::BlobStoreFailed,
            GateError::PackageNotFound { .. } => ErrorKind::PackageNotFound,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.kind() {
            ErrorKind::Conflict | ErrorKind::Disqualified => ExitCode::PackageRejected,
            ErrorKind::InvalidRequest | ErrorKind::UnrecognizedSource => {
                ExitCode::InvalidArguments
            }
            _ => ExitCode::ApplicationError,
        }
    }
}
