//! Presentation layer: a pure function from session state to a view model.
//!
//! The frontend only draws what `render` returns; it never looks at the raw
//! result to decide colours, labels or which sections to show.

use crate::llm::{AnalysisResult, DiseaseClass};
use crate::session::{SessionSnapshot, UploadStatus};
use serde::Serialize;

const UNRESOLVED_TITLE: &str = "Result uncertain";
const MISSING_RESULT_MESSAGE: &str = "The analysis finished without a result. Please try again.";

/// Above this confidence a disease verdict is painted as a danger.
const DANGER_CONFIDENCE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum View {
    #[serde(rename_all = "camelCase")]
    UploadPrompt {
        title: &'static str,
        subtitle: &'static str,
        accept: &'static str,
        formats_hint: &'static str,
        classes: Vec<ClassCard>,
        analysis_enabled: bool,
        /// Shown when the API key is missing.
        warning: Option<&'static str>,
        /// Last validation message, if a file was just rejected.
        notice: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Progress {
        title: &'static str,
        subtitle: &'static str,
        preview: Option<String>,
        cancel_label: &'static str,
    },
    ResultCard(ResultCard),
    #[serde(rename_all = "camelCase")]
    ErrorCard {
        title: &'static str,
        message: String,
        retry_label: &'static str,
    },
}

/// One row of the dataset class list on the upload screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCard {
    pub index: usize,
    pub label: &'static str,
    pub common_name: &'static str,
    pub summary: &'static str,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Healthy,
    Diseased,
    NotOlive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tone {
    Positive,
    Warning,
    Danger,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultCard {
    pub preview: Option<String>,
    pub verdict: Verdict,
    pub badge_label: &'static str,
    pub badge_tone: Tone,
    pub title: String,
    /// Rounded to a whole percent.
    pub confidence_percent: u8,
    pub score_tone: Tone,
    pub description: String,
    /// Empty unless the plant is an olive and not healthy.
    pub treatments: Vec<String>,
    /// The not-an-olive variant offers a prominent "try another image".
    pub show_retry_button: bool,
    pub reset_label: &'static str,
}

pub fn render(snapshot: &SessionSnapshot) -> View {
    match snapshot.status {
        UploadStatus::Idle => upload_prompt(snapshot),
        UploadStatus::Loading => View::Progress {
            title: "Analyzing image",
            subtitle: "Comparing against the dataset classes...",
            preview: snapshot.preview.clone(),
            cancel_label: "Cancel",
        },
        UploadStatus::Success => match &snapshot.result {
            Some(result) => View::ResultCard(result_card(result, snapshot.preview.clone())),
            None => error_card(MISSING_RESULT_MESSAGE.to_string()),
        },
        UploadStatus::Error => error_card(
            snapshot
                .error
                .clone()
                .unwrap_or_else(|| crate::error::ANALYSIS_UNAVAILABLE_MESSAGE.to_string()),
        ),
    }
}

fn upload_prompt(snapshot: &SessionSnapshot) -> View {
    let classes = DiseaseClass::ALL
        .iter()
        .enumerate()
        .map(|(i, class)| ClassCard {
            index: i + 1,
            label: class.label(),
            common_name: class.common_name(),
            summary: class.summary(),
            tone: class_tone(*class),
        })
        .collect();

    View::UploadPrompt {
        title: "Disease analysis",
        subtitle: "Diagnose diseases on your olive trees in seconds with our AI-assisted model.",
        accept: "image/*",
        formats_hint: "JPG, PNG • MAX 10MB",
        classes,
        analysis_enabled: snapshot.analysis_enabled,
        warning: (!snapshot.analysis_enabled).then_some(crate::error::ANALYSIS_DISABLED_MESSAGE),
        notice: snapshot.notice.clone(),
    }
}

fn error_card(message: String) -> View {
    View::ErrorCard {
        title: "Analysis failed",
        message,
        retry_label: "Try again",
    }
}

pub fn result_card(result: &AnalysisResult, preview: Option<String>) -> ResultCard {
    let verdict = if !result.is_olive_plant {
        Verdict::NotOlive
    } else if result.is_healthy {
        Verdict::Healthy
    } else {
        Verdict::Diseased
    };

    let (badge_label, badge_tone) = match verdict {
        Verdict::Healthy => ("Healthy", Tone::Positive),
        Verdict::NotOlive => ("Undefined", Tone::Warning),
        Verdict::Diseased => ("Disease detected", Tone::Danger),
    };

    let score_tone = match verdict {
        Verdict::Healthy => Tone::Positive,
        Verdict::NotOlive => Tone::Danger,
        Verdict::Diseased if result.confidence_score > DANGER_CONFIDENCE => Tone::Danger,
        Verdict::Diseased => Tone::Neutral,
    };

    let treatments = if result.needs_treatment() {
        result.treatment_suggestions.clone()
    } else {
        Vec::new()
    };

    ResultCard {
        preview,
        verdict,
        badge_label,
        badge_tone,
        // A label on something that isn't an olive plant means nothing.
        title: match (verdict, result.disease_name) {
            (Verdict::NotOlive, _) | (_, None) => UNRESOLVED_TITLE.to_string(),
            (_, Some(class)) => class.label().to_string(),
        },
        confidence_percent: result.confidence_score.round().clamp(0.0, 100.0) as u8,
        score_tone,
        description: result.description.clone(),
        treatments,
        show_retry_button: verdict == Verdict::NotOlive,
        reset_label: "New analysis",
    }
}

fn class_tone(class: DiseaseClass) -> Tone {
    match class {
        DiseaseClass::AculusOlearius => Tone::Warning,
        DiseaseClass::OlivePeacockSpot => Tone::Danger,
        DiseaseClass::Healthy => Tone::Positive,
    }
}
