pub mod agent;
pub mod assistant;
pub mod executor;
pub mod handlers;
pub mod logs;
pub mod prompts;
pub mod retry;
pub mod schema;
pub mod session;
