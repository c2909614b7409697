//! Neurogen - retrieval-augmented question answering server
//!
//! An HTTP service that answers questions about cognitive health by
//! conditioning a chat completion on retrieved reference text. Per request
//! the pipeline runs three sequential upstream calls:
//!
//! 1. **Embed** the question via the embedding service
//! 2. **Retrieve** the top-K nearest documents from the vector index
//! 3. **Complete** a chat prompt built from the assembled context
//!
//! and returns the generated answer plus the retrieved source identifiers.
//!
//! # Routes
//!
//! - `POST /api/chat` - retrieval-augmented answering (embed → retrieve →
//!   complete), returns `{"answer", "sources"}`
//! - `POST /api/ask` - pastes a preloaded knowledge-base file into a single
//!   prompt, returns `{"answer"}`
//! - `POST /api/answers` - forwards the question and a preloaded document
//!   list to the hosted answers endpoint, returns `{"answer"}`
//! - `GET /`, `/health`, `/ready`, `/metrics` - info and probes
//!
//! # Error surface
//!
//! Missing or empty `question` → 400, non-POST on a question route → 405,
//! any upstream failure → 500 with the upstream message passed through
//! verbatim. Always the flat `{"error": <message>}` body.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use neurogen::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     neurogen::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod config;
pub mod corpus;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod server;
pub mod state;
pub mod sudoku;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, start_server};
pub use state::AppState;
