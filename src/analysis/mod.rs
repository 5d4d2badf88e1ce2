// Journal analysis pipeline
//
// classify -> history -> prompt -> provider -> parse -> render ->
// persist. The model's output is negotiated through a sum type of
// recognized shapes rather than key sniffing.

mod pipeline;
mod prompt;
mod render;
mod response;

pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use prompt::{build_prompt, PromptContext};
pub use render::render_payload;
pub use response::{
    AnalysisPayload, EnhancedAnalysis, ReflectivePause, RelationshipExploration,
    StructuredAnalysis, ThoughtPattern,
};
