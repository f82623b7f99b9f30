//! Gemini vision CLASSIFY call: single non-streaming `generateContent`.
//!
//! Request: the image as `inlineData` plus the classify prompt, with
//! `responseMimeType: "application/json"` and a `responseSchema` so the
//! model answers with bare JSON (no fence stripping).
//!
//! Response: text in `candidates[0].content.parts[*].text`, token usage in
//! `usageMetadata`. The text is validated into an `AnalysisResult`.

use super::prompts::{build_classify_prompt, response_schema};
use super::provider::Classifier;
use super::types::AnalysisResult;
use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::upload::EncodedImage;

pub const GEMINI_TEMPERATURE: f64 = 0.1;

/// Gemini Flash pricing, USD per 1M tokens.
const INPUT_COST_PER_MILLION: f64 = 0.30;
const OUTPUT_COST_PER_MILLION: f64 = 2.50;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
    prompt: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AnalysisError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_base: config.api_base.clone(),
            prompt: build_classify_prompt(&config.response_language),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    async fn classify_image(&self, image: &EncodedImage) -> Result<AnalysisResult, AnalysisError> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                log::warn!("[ANALYSIS] No API key set, analysis disabled");
                return Err(AnalysisError::MissingCredential);
            }
        };

        log::info!("[ANALYSIS] Provider: gemini");
        log::info!("[ANALYSIS] Model: {}", self.model);
        log::info!(
            "[ANALYSIS] Payload: {} ({} base64 chars)",
            image.mime_type,
            image.base64.len()
        );

        let start = std::time::Instant::now();

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&build_request_body(image, &self.prompt))
            .send()
            .await
            .map_err(|e| {
                log::error!("[ANALYSIS] HTTP request failed: {}", e);
                AnalysisError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("[ANALYSIS] Gemini API returned {}: {}", status, body);
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            log::error!("[ANALYSIS] Response body was not JSON: {}", e);
            AnalysisError::from(e)
        })?;

        log::info!("[ANALYSIS] API latency: {}ms", start.elapsed().as_millis());
        log_usage(&body);

        let text = extract_response_text(&body).ok_or_else(|| {
            log::warn!("[ANALYSIS] No text in response: {}", body);
            AnalysisError::EmptyResponse
        })?;

        match AnalysisResult::from_model_text(&text) {
            Ok(result) => {
                log::info!("[ANALYSIS] Parse result: success");
                log::info!(
                    "[ANALYSIS] olive={} healthy={} class={} confidence={}",
                    result.is_olive_plant,
                    result.is_healthy,
                    result
                        .disease_name
                        .map(|c| c.label())
                        .unwrap_or("unresolved"),
                    result.confidence_score
                );
                Ok(result)
            }
            Err(e) => {
                log::warn!("[ANALYSIS] Rejected model output: {}", e);
                log::warn!(
                    "[ANALYSIS] Raw text: {}",
                    text.chars().take(500).collect::<String>()
                );
                Err(e)
            }
        }
    }
}

impl Classifier for GeminiClient {
    fn classify(
        &self,
        image: &EncodedImage,
    ) -> impl std::future::Future<Output = Result<AnalysisResult, AnalysisError>> + Send {
        self.classify_image(image)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// JSON body for `generateContent`.
pub(crate) fn build_request_body(image: &EncodedImage, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {
                "role": "user",
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": image.base64
                        }
                    },
                    {
                        "text": prompt
                    }
                ]
            }
        ],
        "generationConfig": {
            "temperature": GEMINI_TEMPERATURE,
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Concatenate the text parts of the first candidate.
///
/// Returns `None` when there is no candidate or every part is blank.
pub(crate) fn extract_response_text(body: &serde_json::Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn log_usage(body: &serde_json::Value) {
    let Some(usage) = body.get("usageMetadata") else {
        return;
    };
    let input_tokens = usage["promptTokenCount"].as_u64().unwrap_or(0);
    let output_tokens = usage["candidatesTokenCount"].as_u64().unwrap_or(0);
    log::info!("[ANALYSIS] Input tokens: {}", input_tokens);
    log::info!("[ANALYSIS] Output tokens: {}", output_tokens);
    let cost = (input_tokens as f64 * INPUT_COST_PER_MILLION
        + output_tokens as f64 * OUTPUT_COST_PER_MILLION)
        / 1_000_000.0;
    log::info!("[ANALYSIS] Estimated cost: ${:.6}", cost);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> EncodedImage {
        EncodedImage {
            base64: "b2xpdmU=".into(),
            mime_type: "image/jpeg".into(),
            preview_data_url: "data:image/jpeg;base64,b2xpdmU=".into(),
        }
    }

    #[test]
    fn request_puts_image_before_prompt() {
        let body = build_request_body(&leaf(), "classify this");
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "b2xpdmU=");
        assert_eq!(parts[1]["text"], "classify this");
    }

    #[test]
    fn request_enforces_json_schema() {
        let body = build_request_body(&leaf(), "p");
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn extracts_and_joins_text_parts() {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [ { "text": "{\"a\":" }, { "text": "1}" } ] }
            }]
        });
        assert_eq!(extract_response_text(&body).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn no_candidates_means_no_text() {
        let blocked = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(extract_response_text(&blocked), None);

        let blank = serde_json::json!({
            "candidates": [{ "content": { "parts": [ { "text": "  " } ] } }]
        });
        assert_eq!(extract_response_text(&blank), None);
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = GeminiClient::new(&AppConfig {
            api_base: "http://127.0.0.1:1".into(),
            ..AppConfig::default()
        })
        .unwrap();
        assert!(!client.is_configured());
        assert_eq!(
            client.classify(&leaf()).await,
            Err(AnalysisError::MissingCredential)
        );
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(&AppConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
