//! Cliente del modelo de lenguaje del chatbot
//!
//! El chatbot depende del trait `LlmClient`; la implementación real habla
//! con un endpoint `generateContent` estilo Gemini mediante reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{config::LlmConfig, utils::errors::AppError};

/// Contexto antepuesto a cada consulta
const TELECOM_CONTEXT: &str = "Eres un asistente especializado en telecomunicaciones. \
Enfócate en: análisis de redes, BTS/radioespectro, análisis forense informático, \
comunicaciones y experticia técnica. Responde de manera clara y práctica.";

const FALLBACK_RESPONSE: &str = "Lo siento, no pude procesar tu mensaje.";

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Genera la respuesta a un mensaje del usuario
    async fn generate(&self, message: &str) -> Result<String, AppError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
    }
}

/// Cliente HTTP para la API de Gemini
pub struct GeminiClient {
    client: Client,
    config: LlmConfig,
}

impl GeminiClient {
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Internal(format!("Error creando cliente HTTP: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, message: &str) -> Result<String, AppError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalApi("LLM_API_KEY no configurada".to_string()))?;

        let prompt = format!("{}\n\nConsulta: {}", TELECOM_CONTEXT, message);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let url = format!(
            "{}/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        );

        info!("🤖 Enviando consulta al modelo {}", self.config.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Error llamando al LLM: {}", e);
                AppError::ExternalApi(format!("Error al procesar el mensaje: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApi(format!(
                "El LLM respondió con estado {}",
                status
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta inválida del LLM: {}", e)))?;

        Ok(parsed
            .first_text()
            .unwrap_or_else(|| FALLBACK_RESPONSE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_skips_empty_candidates() {
        let parsed: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": null},
                {"content": {"parts": [{"text": "Hola"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("Hola"));
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let parsed: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(parsed.first_text(), None);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_external_error() {
        let client = GeminiClient::new(LlmConfig {
            api_url: "http://localhost:1".to_string(),
            api_key: None,
            model: "test".to_string(),
        })
        .unwrap();

        assert!(matches!(
            client.generate("hola").await,
            Err(AppError::ExternalApi(_))
        ));
    }
}
