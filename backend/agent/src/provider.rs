//! Gemini provider client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use atelier_core::{AtelierError, ChatRole, LlmProvider, LlmRequest, LlmResponse};

const GEMINI_API: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// [`LlmProvider`] over the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    http: Client,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    /// The key travels in the `x-goog-api-key` header, never in the
    /// URL, so access logs and transport errors cannot capture it.
    fn request_url(model: &str) -> String {
        format!("{GEMINI_API}/models/{model}:generateContent")
    }

    fn role_name(role: ChatRole) -> &'static str {
        match role {
            ChatRole::User | ChatRole::System => "user",
            ChatRole::Model => "model",
        }
    }

    fn build_body(request: &LlmRequest) -> GenerateRequest {
        GenerateRequest {
            contents: request
                .messages
                .iter()
                .map(|m| Content {
                    role: Some(Self::role_name(m.role).to_string()),
                    parts: vec![Part {
                        text: m.content.clone(),
                    }],
                })
                .collect(),
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_prompt.clone(),
                }],
            },
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let response = self
            .http
            .post(Self::request_url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::build_body(request))
            .send()
            .await
            .context("gemini request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AtelierError::ProviderError {
                provider: "gemini".into(),
                message: format!("HTTP {status}: {body}"),
            }
            .into());
        }

        let parsed: GenerateResponse = response.json().await.context("gemini response parse")?;
        let content = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            provider: "gemini".into(),
            model: request.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::ChatMessage;

    #[test]
    fn body_maps_roles_and_system_instruction() {
        let request = LlmRequest {
            model: "gemini-3-flash-preview".into(),
            system_prompt: "You are Larry.".into(),
            messages: vec![ChatMessage::user("hi"), ChatMessage::model("hello")],
        };
        let body = GeminiProvider::build_body(&request);

        assert_eq!(body.contents.len(), 2);
        assert_eq!(body.contents[0].role.as_deref(), Some("user"));
        assert_eq!(body.contents[1].role.as_deref(), Some("model"));
        assert_eq!(body.system_instruction.parts[0].text, "You are Larry.");
    }

    #[test]
    fn request_url_carries_no_credentials() {
        let url = GeminiProvider::request_url("gemini-3-flash-preview");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
        assert!(!url.contains("key"));
    }

    #[test]
    fn empty_candidates_give_empty_content() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
