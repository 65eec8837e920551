/*!
 * Subtitle translation pipeline.
 *
 * Decode, parse, translate and write one subtitle file, with fetching and
 * caching around it.
 */

pub mod orchestrator;

// Re-export types used externally
pub use orchestrator::{validate_target_language, PipelineOrchestrator, PipelineOutput, ProgressCallback};
