// Resume extractor: PDF text → LLM → normalized `ResumeRecord`, plus a
// flat-file store for saved records.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pdf;
pub mod prompts;
pub mod store;
pub mod summary;
