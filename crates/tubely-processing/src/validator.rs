/// Content type validation errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing Content-Type for file")]
    MissingContentType,

    #[error("Invalid Content-Type: {0}")]
    MalformedContentType(String),

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },
}

/// Normalize a declared content type to its bare `type/subtype`.
///
/// Parameters are stripped and the result is lowercased. Returns `None`
/// unless both parts are present and non-empty.
pub fn parse_media_type(raw: &str) -> Option<String> {
    let essence = raw.split(';').next()?.trim().to_lowercase();
    let (kind, subtype) = essence.split_once('/')?;
    if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
        return None;
    }
    Some(essence)
}

/// Checks declared content types against an allow-list.
#[derive(Debug, Clone)]
pub struct ContentTypeValidator {
    allowed_content_types: Vec<String>,
}

impl ContentTypeValidator {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .collect(),
        }
    }

    /// Validate a declared content type, returning its normalized form.
    pub fn validate(&self, content_type: Option<&str>) -> Result<String, ValidationError> {
        let raw = content_type
            .filter(|ct| !ct.trim().is_empty())
            .ok_or(ValidationError::MissingContentType)?;

        let media_type = parse_media_type(raw)
            .ok_or_else(|| ValidationError::MalformedContentType(raw.to_string()))?;

        if !self.allowed_content_types.contains(&media_type) {
            return Err(ValidationError::InvalidContentType {
                content_type: media_type,
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(media_type)
    }
}
