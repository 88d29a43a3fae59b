//! Response Normalizer: reconciles AI output with the submitted fields.
//!
//! Two stages:
//! 1. `AiDraft::parse`: strict JSON parse, then the outermost `{...}` span.
//!    Anything else is "no AI data" (`None`).
//! 2. `merge`: deterministic per-field merge with fallbacks from `ResumeInput`.
//!
//! Nothing in here can fail; the worst case is a record built purely from the input.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::generation::clean::{clean_text, clean_value, strip_bullet_marker};
use crate::models::resume::{Contact, EducationEntry, ExperienceEntry, ResumeInput, ResumeRecord};

/// Appended to a clipped summary; counts toward the limit.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Upper bound on summary length in characters, ellipsis included.
    pub summary_max_chars: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            summary_max_chars: 500,
        }
    }
}

/// Fields recovered from the AI response, already cleaned.
/// `None` / empty means "absent or empty" and triggers the fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

impl AiDraft {
    /// Returns `None` when no JSON object can be recovered from `raw`.
    pub fn parse(raw: &str) -> Option<Self> {
        extract_json_object(raw).map(Self::from_object)
    }

    pub fn from_object(mut object: Map<String, Value>) -> Self {
        object.values_mut().for_each(clean_value);

        let contact = object.get("contact").and_then(Value::as_object);
        let contact_field = |key: &str| {
            contact
                .and_then(|c| scalar_text(c.get(key)))
                .or_else(|| scalar_text(object.get(key)))
        };

        AiDraft {
            name: scalar_text(object.get("name")),
            email: contact_field("email"),
            phone: contact_field("phone"),
            location: contact_field("location"),
            role: first_text(&object, &["role", "title", "headline"]),
            summary: scalar_text(object.get("summary")),
            skills: object.get("skills").map(skills_from).unwrap_or_default(),
            experience: object.get("experience").map(experience_from).unwrap_or_default(),
            education: object.get("education").map(education_from).unwrap_or_default(),
        }
    }
}

/// Strict parse first, then the span from the first `{` to the last `}`.
pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    static OBJECT_SPAN_RE: OnceLock<Regex> = OnceLock::new();

    let text = raw.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Some(map);
    }

    let span_re = OBJECT_SPAN_RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap());
    let span = span_re.find(text)?;
    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(Value::Object(map)) => Some(map),
        _ => {
            debug!("AI response contained no parseable JSON object");
            None
        }
    }
}

/// Normalizes raw AI text (or its absence) into a render-safe record.
pub fn normalize_response(
    raw: Option<&str>,
    input: &ResumeInput,
    options: &NormalizeOptions,
) -> ResumeRecord {
    let draft = raw.and_then(AiDraft::parse);
    merge(draft.unwrap_or_default(), input, options)
}

/// The record built purely from the submitted fields.
pub fn fallback_record(input: &ResumeInput, options: &NormalizeOptions) -> ResumeRecord {
    merge(AiDraft::default(), input, options)
}

fn merge(draft: AiDraft, input: &ResumeInput, options: &NormalizeOptions) -> ResumeRecord {
    let summary = draft
        .summary
        .unwrap_or_else(|| clean_text(&input.summary_hint));

    ResumeRecord {
        name: draft.name.unwrap_or_else(|| clean_text(&input.name)),
        contact: Contact {
            email: draft.email.or_else(|| non_empty(&input.email)),
            phone: draft.phone.or_else(|| non_empty(&input.phone)),
            location: draft.location.or_else(|| non_empty(&input.location)),
        },
        role: draft.role.or_else(|| non_empty(&input.role)),
        summary: clip_summary(&summary, options.summary_max_chars),
        skills: or_fallback(draft.skills, || split_list(&input.skills_raw)),
        experience: or_fallback(draft.experience, || fallback_experience(&input.experience_raw)),
        education: or_fallback(draft.education, || fallback_education(&input.education_raw)),
    }
}

fn or_fallback<T>(ai: Vec<T>, fallback: impl FnOnce() -> Vec<T>) -> Vec<T> {
    if ai.is_empty() {
        fallback()
    } else {
        ai
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Clips to `max_chars` characters including the trailing ellipsis.
fn clip_summary(summary: &str, max_chars: usize) -> String {
    if summary.chars().count() <= max_chars {
        return summary.to_string();
    }
    if max_chars < ELLIPSIS.len() {
        return summary.chars().take(max_chars).collect();
    }
    let keep = max_chars - ELLIPSIS.len();
    let mut clipped: String = summary.chars().take(keep).collect();
    clipped.truncate(clipped.trim_end().len());
    clipped.push_str(ELLIPSIS);
    clipped
}

// ────────────────────────────────────────────────────────────────────────────
// Fallbacks from raw input
// ────────────────────────────────────────────────────────────────────────────

/// Comma (or line) separated list → trimmed, non-empty items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(clean_text)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The whole experience blob becomes the company of a single entry.
fn fallback_experience(raw: &str) -> Vec<ExperienceEntry> {
    non_empty(raw)
        .map(|company| {
            vec![ExperienceEntry {
                company,
                ..Default::default()
            }]
        })
        .unwrap_or_default()
}

fn fallback_education(raw: &str) -> Vec<EducationEntry> {
    split_education(raw).into_iter().collect()
}

/// `degree, institution, year`. Extra middle parts stay with the institution.
fn split_education(raw: &str) -> Option<EducationEntry> {
    let parts = split_list(raw);
    let entry = match parts.as_slice() {
        [] => return None,
        [degree] => EducationEntry {
            degree: degree.clone(),
            ..Default::default()
        },
        [degree, institution] => EducationEntry {
            degree: degree.clone(),
            institution: institution.clone(),
            ..Default::default()
        },
        [degree, middle @ .., year] => EducationEntry {
            degree: degree.clone(),
            institution: middle.join(", "),
            year: year.clone(),
        },
    };
    Some(entry)
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient readers for AI-supplied shapes
// ────────────────────────────────────────────────────────────────────────────

/// Strings (trimmed, non-empty) and numbers; everything else is absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| scalar_text(object.get(*key)))
}

fn skills_from(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(obj) => first_text(obj, &["name", "skill"]),
                other => scalar_text(Some(other)),
            })
            .collect(),
        Value::String(s) => split_list(s),
        _ => Vec::new(),
    }
}

fn experience_from(value: &Value) -> Vec<ExperienceEntry> {
    entries_from(value, |item| match item {
        Value::Object(obj) => Some(ExperienceEntry {
            title: first_text(obj, &["title", "role", "position"]).unwrap_or_default(),
            company: first_text(obj, &["company", "organization", "employer"]).unwrap_or_default(),
            period: first_text(obj, &["period", "dates", "duration"]).unwrap_or_default(),
            points: ["points", "bullets", "highlights", "responsibilities"]
                .iter()
                .find_map(|key| obj.get(*key))
                .map(points_from)
                .unwrap_or_default(),
        }),
        other => scalar_text(Some(other)).map(|company| ExperienceEntry {
            company,
            ..Default::default()
        }),
    })
    .into_iter()
    .filter(|entry| !entry.is_blank())
    .collect()
}

fn education_from(value: &Value) -> Vec<EducationEntry> {
    entries_from(value, |item| match item {
        Value::Object(obj) => Some(EducationEntry {
            degree: first_text(obj, &["degree", "qualification"]).unwrap_or_default(),
            institution: first_text(obj, &["institution", "school", "university"])
                .unwrap_or_default(),
            year: first_text(obj, &["year", "period", "graduation_year"]).unwrap_or_default(),
        }),
        other => scalar_text(Some(other)).and_then(|s| split_education(&s)),
    })
    .into_iter()
    .filter(|entry| !entry.is_blank())
    .collect()
}

/// A list of items, or a single item standing in for a one-element list.
fn entries_from<T>(value: &Value, read: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    match value {
        Value::Array(items) => items.iter().filter_map(&read).collect(),
        Value::Null => Vec::new(),
        single => read(single).into_iter().collect(),
    }
}

fn points_from(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(|p| scalar_text(Some(p))).collect(),
        Value::String(s) => s.lines().map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.iter()
        .map(|p| strip_bullet_marker(p).trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
