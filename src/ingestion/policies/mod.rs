mod license_policy;
mod version_pinning_policy;

pub use license_policy::LicensePolicy;
pub use version_pinning_policy::VersionPinningPolicy;
