//! Document rendering — turns a [`StructuredResume`] into PDF or DOCX bytes.
//!
//! The two backends share the `SectionContent` contract: they must produce
//! layouts with identical information content (every section, entry, and
//! field), but are free to differ in exact geometry. The PDF backend places
//! everything on a fixed canvas with pre-computed page breaks; the DOCX
//! backend emits a flowed document and lets the consumer reflow it.

pub mod branding;
pub mod docx;
pub mod pdf;

use std::path::Path;
use std::str::FromStr;

use bytes::Bytes;

use crate::errors::EngineError;
use crate::models::resume::StructuredResume;
use branding::Branding;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Docx,
}

impl OutputFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => PDF_MIME,
            OutputFormat::Docx => DOCX_MIME,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
        }
    }

    /// Uppercase format name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "PDF",
            OutputFormat::Docx => "DOCX",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "docx" => Ok(OutputFormat::Docx),
            other => Err(EngineError::InvalidResume(format!(
                "Invalid output format requested: '{other}'"
            ))),
        }
    }
}

/// A finished render: the output bytes plus what the web layer needs to serve
/// them as a download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Bytes,
    pub mime: &'static str,
    pub filename: String,
}

/// Renders a structured resume with company branding into the requested
/// format.
///
/// Resolves the branding selector first — an unknown non-empty selector fails
/// the whole render with [`EngineError::MissingAsset`] before any drawing
/// starts. Each call owns its own layout state and output buffer, so callers
/// may run renders concurrently.
pub fn render(
    resume: &StructuredResume,
    branding_selector: &str,
    assets_dir: &Path,
    format: OutputFormat,
) -> Result<RenderedDocument, EngineError> {
    let branding = Branding::resolve(branding_selector, assets_dir)?;

    let bytes = match format {
        OutputFormat::Pdf => pdf::render(resume, &branding)?,
        OutputFormat::Docx => docx::render(resume, &branding)?,
    };

    tracing::info!(
        format = format.name(),
        company = branding.display_name(),
        bytes = bytes.len(),
        "Rendered resume document"
    );

    Ok(RenderedDocument {
        bytes: Bytes::from(bytes),
        mime: format.mime(),
        filename: format!(
            "Updated_Resume_{}.{}",
            branding.display_name(),
            format.extension()
        ),
    })
}
