//! Tailor Engine — resume tailoring core.
//!
//! The engine takes an uploaded resume document, extracts its text, asks an
//! LLM for a scored compatibility analysis against a job description,
//! optionally asks the same LLM to rewrite the resume into a structured JSON
//! representation, and renders that structure back into a PDF or DOCX with
//! company-branded styling.
//!
//! The web request layer (routing, sessions, uploads) is an external
//! collaborator: it calls [`extract::extract_text`], the [`analysis`]
//! functions, and [`render::render`], and maps [`errors::EngineError`] to
//! HTTP responses via [`errors::EngineError::status_code`].

pub mod analysis;
pub mod config;
pub mod errors;
pub mod extract;
pub mod layout;
pub mod llm_client;
pub mod models;
pub mod render;

pub use errors::EngineError;
pub use models::resume::StructuredResume;
pub use render::{render, OutputFormat, RenderedDocument};
