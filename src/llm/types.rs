//! Classification result types.
//!
//! The model returns JSON matching `responseSchema` in prompts.rs. It is
//! parsed into a loose wire struct first, then checked against the closed
//! taxonomy and the 0–100 score range before an `AnalysisResult` exists.

use super::taxonomy::DiseaseClass;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// A validated classification. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_olive_plant: bool,
    pub is_healthy: bool,
    pub disease_name: Option<DiseaseClass>,
    pub confidence_score: f64,
    pub description: String,
    pub treatment_suggestions: Vec<String>,
}

/// Exactly what the model sent, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnalysis {
    is_olive_plant: bool,
    is_healthy: bool,
    disease_name: Option<String>,
    confidence_score: f64,
    description: String,
    treatment_suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Whether the treatment list should be acted on at all.
    pub fn needs_treatment(&self) -> bool {
        self.is_olive_plant && !self.is_healthy
    }

    /// Parse and validate the model's JSON text.
    pub fn from_model_text(text: &str) -> Result<Self, AnalysisError> {
        let json_str = text.trim();
        if json_str.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        let wire: WireAnalysis = serde_json::from_str(json_str)
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        let disease_name = match wire.disease_name.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(
                label
                    .parse::<DiseaseClass>()
                    .map_err(|e| AnalysisError::SchemaViolation(format!("diseaseName: {}", e)))?,
            ),
        };

        let score = wire.confidence_score;
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(AnalysisError::SchemaViolation(format!(
                "confidenceScore {} outside 0-100",
                score
            )));
        }

        let result = AnalysisResult {
            is_olive_plant: wire.is_olive_plant,
            is_healthy: wire.is_healthy,
            disease_name,
            confidence_score: score,
            description: wire.description,
            treatment_suggestions: wire.treatment_suggestions,
        };
        result.log_inconsistencies();
        Ok(result)
    }

    /// The model is asked for a consistent answer but nothing forces it.
    /// These are tolerated; the view only trusts `needs_treatment()`.
    fn log_inconsistencies(&self) {
        if let Some(class) = self.disease_name {
            if class.is_healthy() != self.is_healthy {
                log::warn!(
                    "[ANALYSIS] isHealthy={} disagrees with diseaseName={}",
                    self.is_healthy,
                    class
                );
            }
        }
        if self.is_healthy && !self.treatment_suggestions.is_empty() {
            log::warn!(
                "[ANALYSIS] Healthy result carries {} treatment suggestions",
                self.treatment_suggestions.len()
            );
        }
        if self.needs_treatment() && self.treatment_suggestions.is_empty() {
            log::warn!("[ANALYSIS] Diseased result without treatment suggestions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEACOCK: &str = r#"{
        "isOlivePlant": true,
        "isHealthy": false,
        "diseaseName": "Olive Peacock Spot",
        "confidenceScore": 87,
        "description": "Concentric dark rings on the upper leaf surface.",
        "treatmentSuggestions": ["Spray copper in autumn", "Prune for airflow", "Remove fallen leaves"]
    }"#;

    #[test]
    fn parses_a_diseased_result() {
        let result = AnalysisResult::from_model_text(PEACOCK).unwrap();
        assert_eq!(result.disease_name, Some(DiseaseClass::OlivePeacockSpot));
        assert_eq!(result.confidence_score, 87.0);
        assert_eq!(result.treatment_suggestions.len(), 3);
        assert!(result.needs_treatment());
    }

    #[test]
    fn blank_text_is_empty_response() {
        assert_eq!(
            AnalysisResult::from_model_text("  \n"),
            Err(AnalysisError::EmptyResponse)
        );
    }

    #[test]
    fn non_json_is_malformed() {
        let err = AnalysisResult::from_model_text("The leaf looks healthy.").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = AnalysisResult::from_model_text(r#"{"isOlivePlant": true}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn invented_label_is_schema_violation() {
        let text = PEACOCK.replace("Olive Peacock Spot", "Olive Knot");
        let err = AnalysisResult::from_model_text(&text).unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaViolation(_)));
    }

    #[test]
    fn out_of_range_score_is_schema_violation() {
        for bad in ["101", "-1", "250.5"] {
            let text = PEACOCK.replace("87", bad);
            let err = AnalysisResult::from_model_text(&text).unwrap_err();
            assert!(matches!(err, AnalysisError::SchemaViolation(_)), "score {}", bad);
        }
    }

    #[test]
    fn null_disease_name_is_unresolved() {
        let text = PEACOCK.replace("\"Olive Peacock Spot\"", "null");
        let result = AnalysisResult::from_model_text(&text).unwrap();
        assert_eq!(result.disease_name, None);
    }

    #[test]
    fn serializes_with_wire_names() {
        let result = AnalysisResult::from_model_text(PEACOCK).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["diseaseName"], "Olive Peacock Spot");
        assert_eq!(json["isOlivePlant"], true);
        assert!(json["treatmentSuggestions"].is_array());
    }
}
