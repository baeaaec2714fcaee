//! OpenAI implementation of the AI trait.
//!
//! A reference implementation using chat completions for the reasoning
//! operations and text-embedding-3-small for embeddings.
//!
//! # Example
//!
//! ```rust,ignore
//! use verification::ai::OpenAI;
//!
//! let ai = OpenAI::from_env()?.with_model("gpt-4o-mini");
//! let pipeline = AnalysisPipeline::new(source, ai);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::pipeline::parse::{parse_entities_response, parse_verdict_response};
use crate::pipeline::prompts::{
    format_extract_prompt, format_summary_prompt, format_verify_prompt, EXTRACT_ENTITIES_PROMPT,
    SUMMARY_PROMPT, VERIFY_CONSISTENCY_PROMPT,
};
use crate::security::credentials::{api_key_from_env, SecretString};
use crate::traits::ai::AI;
use crate::types::{
    entity::Entity,
    issue::{SimilarEntity, Verdict},
    report::RunStatistics,
};

/// Environment variable the API key is read from.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// OpenAI-backed AI implementation.
#[derive(Clone)]
pub struct OpenAI {
    client: Client,
    api_key: SecretString,
    model: String,
    embedding_model: String,
    base_url: String,
}

impl OpenAI {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::new(api_key),
            model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    ///
    /// A missing key is a configuration error: the pipeline cannot start
    /// without one.
    pub fn from_env() -> Result<Self> {
        let api_key = api_key_from_env(API_KEY_ENV)?;
        Ok(Self {
            client: Client::new(),
            api_key,
            model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        })
    }

    /// Set the chat model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the embedding model (default: text-embedding-3-small).
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the current chat model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Make a chat completion request.
    async fn chat(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(0.1),
            max_tokens: Some(max_tokens),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Ai(e.to_string().into()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Ai(
                format!("OpenAI API error: {error_text}").into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Ai(e.to_string().into()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnalysisError::Ai("no response from OpenAI".into()))
    }

    /// Make an embedding request.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Ai(e.to_string().into()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Ai(
                format!("OpenAI embedding error: {error_text}").into(),
            ));
        }

        let embed_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Ai(e.to_string().into()))?;

        embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AnalysisError::Ai("no embedding from OpenAI".into()))
    }
}

#[async_trait]
impl AI for OpenAI {
    async fn extract_entities(&self, content: &str) -> Result<Vec<Entity>> {
        let user = format_extract_prompt(content);
        let response = self.chat(EXTRACT_ENTITIES_PROMPT, &user, 2000).await?;
        parse_entities_response(&response)
    }

    async fn verify_consistency(
        &self,
        entity: &Entity,
        references: &[SimilarEntity],
    ) -> Result<Verdict> {
        let user = format_verify_prompt(entity, references);
        let response = self.chat(VERIFY_CONSISTENCY_PROMPT, &user, 500).await?;
        parse_verdict_response(&response)
    }

    async fn summarize_run(&self, statistics: &RunStatistics) -> Result<String> {
        let user = format_summary_prompt(statistics);
        let response = self.chat(SUMMARY_PROMPT, &user, 300).await?;
        Ok(response.trim().to_string())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text).await
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides() {
        let ai = OpenAI::new("sk-test")
            .with_model("gpt-4o-mini")
            .with_embedding_model("text-embedding-3-large")
            .with_base_url("https://custom.api.com");

        assert_eq!(ai.model(), "gpt-4o-mini");
        assert_eq!(ai.embedding_model, "text-embedding-3-large");
        assert_eq!(ai.base_url, "https://custom.api.com");
    }
}
