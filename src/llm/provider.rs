//! Classifier trait: the seam between the session and the model.
//!
//! `GeminiClient` is the production implementation. Tests drive the
//! session with scripted classifiers instead of the network.

use super::types::AnalysisResult;
use crate::error::AnalysisError;
use crate::upload::EncodedImage;
use std::future::Future;

pub trait Classifier: Send + Sync + 'static {
    /// One request/response exchange. No retries.
    fn classify(
        &self,
        image: &EncodedImage,
    ) -> impl Future<Output = Result<AnalysisResult, AnalysisError>> + Send;

    /// False when the credential is missing and every call would fail.
    fn is_configured(&self) -> bool;
}
