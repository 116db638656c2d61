use serde::{Deserialize, Serialize};

pub const DEFAULT_ENCODING_FORMAT: &str = "text/plain";

/// Where the template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    /// A local file path or an `http(s)://` URL.
    Reference(String),
}

impl TemplateSource {
    /// Picks inline text over a reference. Empty strings count as absent.
    pub fn from_fields(text: Option<&str>, reference: Option<&str>) -> Option<Self> {
        let non_empty = |s: &&str| !s.is_empty();

        if let Some(text) = text.filter(non_empty) {
            return Some(TemplateSource::Inline(text.to_string()));
        }

        reference
            .filter(non_empty)
            .map(|reference| TemplateSource::Reference(reference.to_string()))
    }

    pub fn is_remote(&self) -> bool {
        match self {
            TemplateSource::Inline(_) => false,
            TemplateSource::Reference(location) => {
                location.starts_with("http://") || location.starts_with("https://")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderResult {
    pub output: String,
    pub encoding_format: String,
    pub content_size: usize,
}

impl RenderResult {
    pub fn new(output: String, encoding_format: Option<&str>) -> Self {
        let encoding_format = encoding_format
            .filter(|format| !format.is_empty())
            .unwrap_or(DEFAULT_ENCODING_FORMAT)
            .to_string();
        let content_size = output.len();

        Self {
            output,
            encoding_format,
            content_size,
        }
    }
}
