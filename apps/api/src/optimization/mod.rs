// Keyword-driven rewriting: prompt construction, highlighting, density scoring
// and the pipeline that ties them to the keyword store and feedback ledger.

pub mod handlers;
pub mod highlighter;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
