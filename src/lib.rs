// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod celebration;
pub mod client;
pub mod config;
pub mod encouragement;
pub mod history;
pub mod quotes;
pub mod runtime;
pub mod segment;
pub mod session;
pub mod tracker;
