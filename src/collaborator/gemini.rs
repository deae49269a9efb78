//! Google Generative Language REST client.

use crate::collaborator::{
    analysis_prompt, system_instruction, Collaborator, CollaboratorError, ANALYSIS_FALLBACK,
    REPLY_FALLBACK,
};
use crate::config::GeminiConfig;
use crate::journal::{ChatMessage, JournalSections, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn turn(role: Role, text: &str) -> Self {
        let role = match role {
            Role::User => "user",
            Role::Model => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, or `None` when the model returned nothing.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|part| part.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn build_request(contents: Vec<Content>, temperature: f32) -> GenerateRequest {
    GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_instruction().to_string(),
            }],
        },
        contents,
        generation_config: GenerationConfig { temperature },
    }
}

fn conversation_contents(history: &[ChatMessage], message: &str) -> Vec<Content> {
    history
        .iter()
        .map(|entry| Content::turn(entry.role, &entry.text))
        .chain(std::iter::once(Content::turn(Role::User, message)))
        .collect()
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, CollaboratorError> {
        let mut builder = reqwest::Client::builder().user_agent("mindful/0.1");
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, CollaboratorError> {
        if self.config.api_key.trim().is_empty() {
            return Err(CollaboratorError::MissingApiKey);
        }

        debug!(model = %self.config.model, turns = request.contents.len(), "sending generateContent");
        let resp = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(CollaboratorError::Api {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let bytes = resp.bytes().await?;
        parse_response(&bytes)
    }
}

fn parse_response(bytes: &[u8]) -> Result<Option<String>, CollaboratorError> {
    let body: GenerateResponse = serde_json::from_slice(bytes)?;
    Ok(body.text())
}

#[async_trait]
impl Collaborator for GeminiClient {
    async fn analyze(&self, sections: &JournalSections) -> Result<String, CollaboratorError> {
        let contents = vec![Content::turn(Role::User, &analysis_prompt(sections))];
        let request = build_request(contents, self.config.analysis_temperature);
        let text = self.generate(&request).await?;
        Ok(text.unwrap_or_else(|| ANALYSIS_FALLBACK.to_string()))
    }

    async fn converse(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, CollaboratorError> {
        let request = build_request(
            conversation_contents(history, message),
            self.config.chat_temperature,
        );
        let text = self.generate(&request).await?;
        Ok(text.unwrap_or_else(|| REPLY_FALLBACK.to_string()))
    }
}
