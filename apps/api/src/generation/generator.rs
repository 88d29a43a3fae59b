//! Resume Generation: orchestrates one submission end to end.
//!
//! Flow: validate → compose prompt → LLM (bounded retries) → normalize →
//!       layout → render artifact.
//!
//! The AI call never fails a submission: when it yields nothing the record is
//! built from the submitted fields alone. Only validation and rendering errors
//! reach the caller.

use serde::Deserialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::composer::{compose_json_prompt, compose_text_prompt};
use crate::generation::normalizer::{fallback_record, normalize_response, NormalizeOptions};
use crate::llm_client::LlmClient;
use crate::models::resume::{ResumeInput, ResumeRecord};
use crate::render::{
    layout_record, layout_text, pdf_artifact, render_plain, Artifact, Block, LayoutOptions,
    PageStyle,
};

/// Output of `POST /api/v1/resumes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredFormat {
    #[default]
    Pdf,
    Json,
}

/// Output of `POST /api/v1/resumes/freeform`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreeformFormat {
    #[default]
    Txt,
    Pdf,
}

/// Everything a submission needs besides its input. Cheap to clone.
#[derive(Clone)]
pub struct ResumeGenerator {
    llm: LlmClient,
    normalize: NormalizeOptions,
    layout: LayoutOptions,
    page: PageStyle,
}

impl ResumeGenerator {
    pub fn new(llm: LlmClient, config: &Config) -> Self {
        Self {
            llm,
            normalize: NormalizeOptions {
                summary_max_chars: config.summary_max_chars,
            },
            layout: LayoutOptions {
                skills_layout: config.skills_layout,
            },
            page: PageStyle::default(),
        }
    }

    /// Structured mode: JSON prompt → normalized record → PDF or JSON.
    pub async fn generate_structured(
        &self,
        input: ResumeInput,
        format: StructuredFormat,
    ) -> Result<Artifact, AppError> {
        input.validate()?;

        let span = info_span!("resume", request_id = %Uuid::new_v4(), mode = "structured");
        async move {
            let record = self.build_record(&input).await;
            info!(
                skills = record.skills.len(),
                experience = record.experience.len(),
                education = record.education.len(),
                "Record normalized"
            );

            match format {
                StructuredFormat::Json => Artifact::json(&record).map_err(AppError::from),
                StructuredFormat::Pdf => {
                    let blocks = layout_record(&record, &self.layout);
                    self.render_pdf(blocks).await
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Plain-text mode: the AI writes the whole resume as text.
    pub async fn generate_freeform(
        &self,
        input: ResumeInput,
        format: FreeformFormat,
    ) -> Result<Artifact, AppError> {
        input.validate()?;

        let span = info_span!("resume", request_id = %Uuid::new_v4(), mode = "freeform");
        async move {
            let prompt = compose_text_prompt(&input);
            let blocks = match self.llm.complete(&prompt).await {
                Some(text) if format == FreeformFormat::Txt => {
                    info!(chars = text.len(), "Returning AI text");
                    return Ok(Artifact::text(text));
                }
                Some(text) => layout_text(&text),
                None => {
                    info!("No AI text, writing the resume from submitted fields");
                    layout_record(&fallback_record(&input, &self.normalize), &self.layout)
                }
            };

            match format {
                FreeformFormat::Txt => Ok(Artifact::text(render_plain(&blocks))),
                FreeformFormat::Pdf => self.render_pdf(blocks).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Prompt, call and normalize. Never fails.
    pub async fn build_record(&self, input: &ResumeInput) -> ResumeRecord {
        let prompt = compose_json_prompt(input);
        let raw = self.llm.complete(&prompt).await;
        if raw.is_none() {
            info!("No AI data, normalizing submitted fields only");
        }
        normalize_response(raw.as_deref(), input, &self.normalize)
    }

    async fn render_pdf(&self, blocks: Vec<Block>) -> Result<Artifact, AppError> {
        let block_count = blocks.len();
        let artifact = pdf_artifact(blocks, self.page).await?;
        info!(blocks = block_count, bytes = artifact.bytes.len(), "PDF rendered");
        Ok(artifact)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::generator_with;
    use super::*;
    use crate::llm_client::testing::ScriptedTransport;

    fn jane() -> ResumeInput {
        ResumeInput {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            skills_raw: "Go, SQL".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_email_is_rejected_before_any_call() {
        let transport = ScriptedTransport::replying("{}");
        let generator = generator_with(transport.clone());
        let input = ResumeInput {
            email: "  ".to_string(),
            ..jane()
        };

        let result = generator.generate_structured(input, StructuredFormat::Pdf).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = generator
            .generate_freeform(ResumeInput::default(), FreeformFormat::Txt)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ai_outage_falls_back_to_submitted_fields() {
        let transport = ScriptedTransport::always_failing();
        let generator = generator_with(transport.clone());

        let record = generator.build_record(&jane()).await;
        assert_eq!(transport.call_count(), 3);
        assert_eq!(record.skills, vec!["Go", "SQL"]);
        assert!(record.experience.is_empty());

        let blocks = layout_record(&record, &LayoutOptions::default());
        let bullets: Vec<_> = blocks
            .iter()
            .filter(|b| matches!(b, Block::Bullet(_)))
            .collect();
        assert_eq!(bullets.len(), 2);
        assert!(!blocks.contains(&Block::Heading("EXPERIENCE".to_string())));
    }

    #[tokio::test]
    async fn test_ai_markdown_is_cleaned_into_the_record() {
        let transport = ScriptedTransport::replying(
            r#"Sure! {"name":"A","skills":["X","Y","Z"],"summary":"**Bold** text [link](http://x)"}"#,
        );
        let generator = generator_with(transport);

        let record = generator.build_record(&jane()).await;
        assert_eq!(record.name, "A");
        assert_eq!(record.skills, vec!["X", "Y", "Z"]);
        assert_eq!(record.summary, "Bold text link");
    }

    #[tokio::test]
    async fn test_structured_json_artifact() {
        let transport = ScriptedTransport::replying(r#"{"summary":"Ships things."}"#);
        let generator = generator_with(transport);

        let artifact = generator
            .generate_structured(jane(), StructuredFormat::Json)
            .await
            .unwrap();
        assert_eq!(artifact.mime, "application/json");
        let record: ResumeRecord = serde_json::from_slice(&artifact.bytes).unwrap();
        assert_eq!(record.summary, "Ships things.");
        assert_eq!(record.contact.email.as_deref(), Some("jane@x.com"));
    }

    #[tokio::test]
    async fn test_structured_pdf_artifact() {
        let transport = ScriptedTransport::replying("not json at all");
        let generator = generator_with(transport);

        let artifact = generator
            .generate_structured(jane(), StructuredFormat::Pdf)
            .await
            .unwrap();
        assert_eq!(artifact.filename, "resume.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_freeform_text_is_returned_verbatim() {
        let transport = ScriptedTransport::replying("JANE DOE\n- Go\n- SQL");
        let generator = generator_with(transport);

        let artifact = generator
            .generate_freeform(jane(), FreeformFormat::Txt)
            .await
            .unwrap();
        assert_eq!(artifact.filename, "resume.txt");
        assert_eq!(&artifact.bytes[..], b"JANE DOE\n- Go\n- SQL");
    }

    #[tokio::test(start_paused = true)]
    async fn test_freeform_outage_writes_text_from_fields() {
        let transport = ScriptedTransport::always_failing();
        let generator = generator_with(transport);

        let artifact = generator
            .generate_freeform(jane(), FreeformFormat::Txt)
            .await
            .unwrap();
        let text = String::from_utf8(artifact.bytes.to_vec()).unwrap();
        assert!(text.starts_with("Jane Doe\njane@x.com"));
        assert!(text.contains("CORE SKILLS\n- Go\n- SQL"));
    }

    #[tokio::test]
    async fn test_freeform_pdf_lays_out_ai_lines() {
        let transport = ScriptedTransport::replying("JANE DOE\n\nSKILLS:\n- Go");
        let generator = generator_with(transport);

        let artifact = generator
            .generate_freeform(jane(), FreeformFormat::Pdf)
            .await
            .unwrap();
        assert_eq!(artifact.mime, "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }
}
