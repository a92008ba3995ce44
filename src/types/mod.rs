//! Type definitions for the summarization API.

pub mod common;
pub mod documents;
pub mod feedback;
pub mod models;
pub mod options;
pub mod summarize;
