//! Classification prompt and response schema.
//!
//! These are the contract between the app and the vision model. The
//! taxonomy section is generated from `DiseaseClass` so the prompt, the
//! schema enum and the parser can never disagree on labels.

use super::taxonomy::DiseaseClass;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LANGUAGE: &str = "Turkish";

/// Build the instruction text sent alongside the image.
///
/// `language` is the language treatment suggestions and the description
/// should be written in.
pub fn build_classify_prompt(language: &str) -> String {
    let mut classes = String::new();
    for (i, class) in DiseaseClass::ALL.iter().enumerate() {
        classes.push_str(&format!(
            "{}. **{}** ({}):\n   - Visual features: {}\n\n",
            i + 1,
            class.label(),
            class.common_name(),
            class.visual_signature()
        ));
    }

    let labels = DiseaseClass::ALL
        .iter()
        .map(|c| format!("'{}'", c.label()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an agricultural engineering assistant trained on a dedicated Olive Disease Dataset.

Your task is to match the attached photo to exactly one of the following 3 DATASET CLASSES.
Do not invent any disease outside these classes. Only use the dataset labels.

### DATASET CLASSES:

{classes}### ANALYSIS STEPS:
1. Verify that the image shows an olive tree, olive leaf or olive fruit. If it does not, set 'isOlivePlant' to false.
2. Match the image to exactly one of the 3 classes above. 'diseaseName' must be one of: {labels}.
3. Give the match strength as 'confidenceScore', a number between 0 and 100.
4. If you detected a disease (the class is not Healthy), give 3-4 actionable agricultural treatment steps (spraying timing, cultural measures, etc.) in 'treatmentSuggestions'. If the class is Healthy, return an empty list.

Write 'description' and 'treatmentSuggestions' in {language}.
Respond only with JSON in the required format."#
    )
}

/// `generationConfig.responseSchema` for the Gemini request.
pub fn response_schema() -> serde_json::Value {
    let labels: Vec<&str> = DiseaseClass::ALL.iter().map(|c| c.label()).collect();
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "isOlivePlant": {
                "type": "BOOLEAN",
                "description": "Is this strictly related to olive plants?"
            },
            "isHealthy": {
                "type": "BOOLEAN",
                "description": "Is the class 'Healthy'?"
            },
            "diseaseName": {
                "type": "STRING",
                "enum": labels,
                "description": "Must be exactly one of: 'Aculus olearius', 'Olive Peacock Spot', or 'Healthy'."
            },
            "confidenceScore": {
                "type": "NUMBER",
                "description": "Confidence score between 0 and 100"
            },
            "description": {
                "type": "STRING",
                "description": "Detailed visual analysis explaining WHY it matches the class."
            },
            "treatmentSuggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3-4 specific treatment steps if diseased."
            }
        },
        "required": [
            "isOlivePlant",
            "isHealthy",
            "diseaseName",
            "confidenceScore",
            "description",
            "treatmentSuggestions"
        ]
    })
}
