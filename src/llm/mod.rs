//! LLM domain: remote olive disease classification.
//!
//! Public API for the analysis layer of Zeytin AI.
//! External code should only use the items exported here.
//!
//!   - taxonomy.rs: the closed three-class label set
//!   - prompts.rs: classify prompt + response schema
//!   - types.rs: AnalysisResult + response validation
//!   - provider.rs: Classifier trait (the session's seam)
//!   - gemini.rs: Gemini implementation

mod gemini;
pub mod prompts;
pub mod provider;
pub mod taxonomy;
pub mod types;

pub use gemini::GeminiClient;
pub use provider::Classifier;
pub use taxonomy::DiseaseClass;
pub use types::AnalysisResult;
