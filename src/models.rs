use serde::{Deserialize, Serialize};

// Inbound translate request (browser -> proxy)
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<serde_json::Value>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default)]
    pub source_lang: Option<String>,
}

// Outbound body sent to the translation API
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UpstreamTranslateRequest {
    pub text: Vec<serde_json::Value>,
    pub target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
}

impl TranslateRequest {
    // Checks required fields and builds the upstream body
    pub fn into_upstream(self) -> Result<UpstreamTranslateRequest, &'static str> {
        let text = match self.text {
            Some(serde_json::Value::Array(items)) if !items.is_empty() => items,
            _ => return Err("Text is required and must be an array"),
        };

        let target_lang = match self.target_lang {
            Some(lang) if !lang.is_empty() => lang,
            _ => return Err("Target language is required"),
        };

        Ok(UpstreamTranslateRequest {
            text,
            target_lang,
            source_lang: self.source_lang.filter(|s| !s.is_empty()),
        })
    }
}

// Key lookup response
#[derive(Serialize, Debug, Clone)]
pub struct KeyResponse {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub service: String,
    pub timestamp: String,
}
