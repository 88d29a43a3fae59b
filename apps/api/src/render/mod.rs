//! Document rendering: record or raw text → blocks → PDF / plain text.

pub mod font_metrics;
pub mod layout;
pub mod pdf;
pub mod text;

use bytes::Bytes;
use thiserror::Error;

pub use layout::{layout_record, layout_text, Block, LayoutOptions, SkillsLayout};
pub use pdf::{render_pdf, PageStyle};
pub use text::render_plain;

use crate::models::resume::ResumeRecord;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Render task failed: {0}")]
    Task(String),

    #[error("Record serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A finished download: body plus the headers that describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub bytes: Bytes,
    pub mime: &'static str,
    pub filename: &'static str,
}

impl Artifact {
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(bytes),
            mime: "application/pdf",
            filename: "resume.pdf",
        }
    }

    pub fn text(text: String) -> Self {
        Self {
            bytes: Bytes::from(text),
            mime: "text/plain; charset=utf-8",
            filename: "resume.txt",
        }
    }

    pub fn json(record: &ResumeRecord) -> Result<Self, RenderError> {
        Ok(Self {
            bytes: Bytes::from(serde_json::to_vec_pretty(record)?),
            mime: "application/json",
            filename: "resume.json",
        })
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Renders blocks to a PDF artifact on the blocking pool.
pub async fn pdf_artifact(blocks: Vec<Block>, style: PageStyle) -> Result<Artifact, RenderError> {
    let bytes = tokio::task::spawn_blocking(move || render_pdf(&blocks, &style))
        .await
        .map_err(|e| RenderError::Task(e.to_string()))??;
    Ok(Artifact::pdf(bytes))
}
