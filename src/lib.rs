pub mod catalog;
pub mod cli;
pub mod color;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod preview;

pub use catalog::ColorTable;
pub use config::EngineConfig;
pub use corpus::{cache_key, ColorInput, ColorKind, Corpus, Request};
pub use error::EngineError;
pub use pipeline::assign::{AssignedGroup, Assignment};
pub use pipeline::{generate, Outcome};
