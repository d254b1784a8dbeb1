use crate::shared::error::GateError;

/// Where the bytes of an inbound package come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// Base64-encoded zip archive supplied by the caller
    Content(String),
    /// npm registry or GitHub URL to fetch the package from
    Url(String),
}

/// An inbound request to ingest a package.
///
/// Exactly one of content or URL is present; this is enforced at
/// construction so downstream stages never see an ambiguous reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReference {
    name: String,
    source: PackageSource,
    debloat: bool,
}

impl PackageReference {
    /// Validates the raw request fields and builds a reference
    ///
    /// Empty strings are treated as absent.
    ///
    /// # Errors
    /// Returns `GateError::InvalidRequest` when the name is blank, the debloat
    /// flag is missing, or when both or neither of `content` and `url` are
    /// supplied.
    pub fn new(
        name: impl Into<String>,
        content: Option<String>,
        url: Option<String>,
        debloat: Option<bool>,
    ) -> Result<Self, GateError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GateError::InvalidRequest {
                reason: "Name must not be empty".to_string(),
            });
        }
        let debloat = debloat.ok_or_else(|| GateError::InvalidRequest {
            reason: "debloat must be specified".to_string(),
        })?;

        let content = content.filter(|c| !c.trim().is_empty());
        let url = url.filter(|u| !u.trim().is_empty());

        let source = match (content, url) {
            (Some(content), None) => PackageSource::Content(content),
            (None, Some(url)) => PackageSource::Url(url.trim().to_string()),
            (Some(_), Some(_)) => {
                return Err(GateError::InvalidRequest {
                    reason: "Content and URL are mutually exclusive".to_string(),
                })
            }
            (None, None) => {
                return Err(GateError::InvalidRequest {
                    reason: "one of Content or URL is required".to_string(),
                })
            }
        };

        Ok(Self {
            name,
            source,
            debloat,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &PackageSource {
        &self.source
    }

    pub fn debloat(&self) -> bool {
        self.debloat
    }

    pub fn is_url_sourced(&self) -> bool {
        matches!(self.source, PackageSource::Url(_))
    }

    pub fn url(&self) -> Option<&str> {
        match &self.source {
            PackageSource::Url(url) => Some(url),
            PackageSource::Content(_) => None,
        }
    }

    /// Short description of the source for log lines and error messages
    pub fn source_label(&self) -> String {
        match &self.source {
            PackageSource::Url(url) => url.clone(),
            PackageSource::Content(content) => format!("uploaded content ({} bytes)", content.len()),
        }
    }
}
