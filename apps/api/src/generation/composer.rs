//! Prompt Composer: interpolates a `ResumeInput` into the fixed instruction templates.
//!
//! Substitution is a single pass: braces inside user text (or inside the literal
//! schema) are never re-expanded.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::generation::prompts::{RESUME_JSON_PROMPT_TEMPLATE, RESUME_TEXT_PROMPT_TEMPLATE};
use crate::llm_client::prompts::{
    INFERENCE_INSTRUCTION, JSON_ONLY_INSTRUCTION, NO_MARKDOWN_INSTRUCTION,
};
use crate::models::resume::ResumeInput;

/// Prompt asking for the structured JSON schema.
pub fn compose_json_prompt(input: &ResumeInput) -> String {
    fill_template(RESUME_JSON_PROMPT_TEMPLATE, input)
}

/// Prompt asking for a plain-text resume.
pub fn compose_text_prompt(input: &ResumeInput) -> String {
    fill_template(RESUME_TEXT_PROMPT_TEMPLATE, input)
}

fn fill_template(template: &str, input: &ResumeInput) -> String {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let placeholder_re = PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

    placeholder_re
        .replace_all(template, |caps: &Captures| {
            let value = match &caps[1] {
                "json_only" => JSON_ONLY_INSTRUCTION,
                "no_markdown" => NO_MARKDOWN_INSTRUCTION,
                "inference" => INFERENCE_INSTRUCTION,
                "name" => input.name.trim(),
                "email" => input.email.trim(),
                "phone" => input.phone.trim(),
                "role" => input.role.trim(),
                "location" => input.location.trim(),
                "summary_hint" => input.summary_hint.trim(),
                "skills_raw" => input.skills_raw.trim(),
                "experience_raw" => input.experience_raw.trim(),
                "education_raw" => input.education_raw.trim(),
                _ => return caps[0].to_string(),
            };
            value.to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ResumeInput {
        ResumeInput {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            skills_raw: "Go, SQL".to_string(),
            experience_raw: "Backend engineer at Acme 2019-2023".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_json_prompt_embeds_fields_and_rules() {
        let prompt = compose_json_prompt(&jane());
        assert!(prompt.contains("Name: Jane Doe"));
        assert!(prompt.contains("Email: jane@x.com"));
        assert!(prompt.contains("Skills (comma): Go, SQL"));
        assert!(prompt.contains("Return JSON ONLY"));
        assert!(prompt.contains("markdown links"));
        assert!(prompt.contains("infer reasonably"));
    }

    #[test]
    fn test_json_prompt_keeps_literal_schema() {
        let prompt = compose_json_prompt(&jane());
        assert!(prompt.contains(r#""contact": {"email": "email""#));
        assert!(prompt.contains(r#""education": ["#));
        assert!(!prompt.contains("{name}"));
        assert!(!prompt.contains("{json_only}"));
    }

    #[test]
    fn test_user_braces_are_not_re_expanded() {
        let input = ResumeInput {
            summary_hint: "I like {email} templates".to_string(),
            ..jane()
        };
        let prompt = compose_json_prompt(&input);
        assert!(prompt.contains("Summary: I like {email} templates"));
    }

    #[test]
    fn test_text_prompt_requests_plain_text() {
        let prompt = compose_text_prompt(&jane());
        assert!(prompt.contains("plain text"));
        assert!(prompt.contains("Experience: Backend engineer at Acme 2019-2023"));
        assert!(!prompt.contains("{inference}"));
    }
}
