use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Raw form fields for one submission. Missing keys deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub location: String,
    pub summary_hint: String,
    /// Comma-delimited.
    pub skills_raw: String,
    pub experience_raw: String,
    pub education_raw: String,
}

impl ResumeInput {
    /// Rejects the submission before any AI call when name or email is blank.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(AppError::Validation("Name & Email required.".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub period: String,
    pub points: Vec<String>,
}

impl ExperienceEntry {
    pub fn is_blank(&self) -> bool {
        self.title.is_empty()
            && self.company.is_empty()
            && self.period.is_empty()
            && self.points.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

impl EducationEntry {
    pub fn is_blank(&self) -> bool {
        self.degree.is_empty() && self.institution.is_empty() && self.year.is_empty()
    }
}

/// The normalized resume, always safe to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: String,
    pub contact: Contact,
    pub role: Option<String>,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}
