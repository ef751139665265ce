//! Gemini API adapters for the transcription and polishing ports
//!
//! Both services are the same `generateContent` endpoint with different
//! prompt payloads, so the wire types and the error mapping live here and
//! the two adapters stay thin.

pub mod polisher;
pub mod transcriber;

pub use polisher::GeminiPolisher;
pub use transcriber::GeminiTranscriber;

use serde::{Deserialize, Serialize};

use crate::application::ports::ServiceError;

/// Gemini API model to use
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Request types for Gemini API

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub(crate) fn inline_data(mime_type: impl Into<String>, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

// Response types for Gemini API

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    code: Option<i32>,
}

/// Shared HTTP client for the generateContent endpoint
pub(crate) struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub(crate) fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub(crate) fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Send one generateContent request and pull the text out of the reply
    pub(crate) async fn generate(&self, parts: Vec<Part>) -> Result<String, ServiceError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        };

        let response = self
            .client
            .post(self.api_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ServiceError::BadCredential);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            return Err(ServiceError::Overloaded(format!("HTTP {}", status)));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServiceError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

        // Errors can also ride in a 200 body
        if let Some(error) = response.error {
            return match error.code {
                Some(429) | Some(503) => Err(ServiceError::Overloaded(error.message)),
                Some(401) | Some(403) => Err(ServiceError::BadCredential),
                _ => Err(ServiceError::RequestFailed(error.message)),
            };
        }

        let text = Self::extract_text(&response).ok_or(ServiceError::EmptyResult)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::EmptyResult);
        }

        Ok(trimmed.to_string())
    }

    /// Extract text from response
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts: Vec<&str> = response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_contains_model_and_key() {
        let client = GeminiClient::new("test-api-key");
        let url = client.api_url();

        assert!(url.contains("gemini-2.5-flash-preview-04-17"));
        assert!(url.contains("test-api-key"));
        assert!(url.contains("generateContent"));
    }

    #[test]
    fn custom_model_and_base_url() {
        let client = GeminiClient::new("key")
            .with_model("custom-model")
            .with_base_url("http://localhost:9999");
        let url = client.api_url();

        assert!(url.starts_with("http://localhost:9999/custom-model"));
    }

    #[test]
    fn part_serialization_skips_absent_fields() {
        let text = serde_json::to_value(Part::text("hello")).unwrap();
        assert_eq!(text["text"], "hello");
        assert!(text.get("inlineData").is_none());

        let inline = serde_json::to_value(Part::inline_data("audio/webm", "AQID".to_string()))
            .unwrap();
        assert!(inline.get("text").is_none());
        assert_eq!(inline["inlineData"]["mimeType"], "audio/webm");
        assert_eq!(inline["inlineData"]["data"], "AQID");
    }

    #[test]
    fn extract_text_from_response() {
        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![ResponsePart {
                        text: Some("Hello world".to_string()),
                    }]),
                }),
            }]),
            error: None,
        };

        assert_eq!(
            GeminiClient::extract_text(&response),
            Some("Hello world".to_string())
        );
    }

    #[test]
    fn extract_text_empty_response() {
        let response = GenerateContentResponse {
            candidates: None,
            error: None,
        };

        assert!(GeminiClient::extract_text(&response).is_none());
    }
}
