// Response normalization: turns free-form LLM text into typed results.
// Everything in here is pure, in-memory string work with no I/O.

pub mod fence;
pub mod json;
pub mod sql;
