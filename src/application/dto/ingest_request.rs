use serde::Deserialize;

/// IngestRequest - Inbound request DTO for the ingestion use case
///
/// Field names follow the registry API body (`Name`, `Content`, `URL`,
/// `debloat`). Validation happens in the use case, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestRequest {
    /// Caller-supplied package label
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Base64-encoded zip archive
    #[serde(rename = "Content", default)]
    pub content: Option<String>,
    /// npm or GitHub URL
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    /// Minify scripts before storing. Required; `None` is rejected by the
    /// use case.
    pub debloat: Option<bool>,
}

impl IngestRequest {
    pub fn from_content(name: impl Into<String>, content: String, debloat: bool) -> Self {
        Self {
            name: name.into(),
            content: Some(content),
            url: None,
            debloat: Some(debloat),
        }
    }

    pub fn from_url(name: impl Into<String>, url: impl Into<String>, debloat: bool) -> Self {
        Self {
            name: name.into(),
            content: None,
            url: Some(url.into()),
            debloat: Some(debloat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_body() {
        let body = r#"{"Name":"lodash","URL":"https://www.npmjs.com/package/lodash","debloat":true}"#;
        let request: IngestRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.name, "lodash");
        assert_eq!(request.url.as_deref(), Some("https://www.npmjs.com/package/lodash"));
        assert!(request.content.is_none());
        assert_eq!(request.debloat, Some(true));
    }

    #[test]
    fn test_missing_debloat_is_kept_absent() {
        let body = r#"{"Name":"lodash","URL":"https://www.npmjs.com/package/lodash"}"#;
        let request: IngestRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.debloat, None);
    }
}
