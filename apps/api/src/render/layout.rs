//! Document layout: turns a `ResumeRecord` (or plain AI text) into an ordered
//! list of styled blocks. Backends (PDF, plain text) only draw blocks.
//!
//! Section order is fixed: summary, skills, experience, education.
//! A section with no content is omitted, heading included.

use std::fmt;
use std::str::FromStr;

use crate::generation::clean::{clean_text, strip_bullet_marker};
use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeRecord};

pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const SKILLS_HEADING: &str = "CORE SKILLS";
pub const EXPERIENCE_HEADING: &str = "EXPERIENCE";
pub const EDUCATION_HEADING: &str = "EDUCATION";

const CONTACT_SEPARATOR: &str = "  |  ";
const INLINE_SKILL_SEPARATOR: &str = "  •  ";
const HEADER_SEPARATOR: &str = " — ";

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Name(String),
    Role(String),
    Contact(String),
    Divider,
    Heading(String),
    Paragraph(String),
    /// `title — company (period)` / `degree — institution (year)`
    EntryHeader(String),
    Bullet(String),
    /// Vertical gap in points.
    Spacer(f32),
}

/// How the skills section is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillsLayout {
    #[default]
    Bullets,
    Inline,
}

impl FromStr for SkillsLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bullets" | "bullet" => Ok(SkillsLayout::Bullets),
            "inline" => Ok(SkillsLayout::Inline),
            other => Err(format!("expected 'bullets' or 'inline', got '{other}'")),
        }
    }
}

impl fmt::Display for SkillsLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillsLayout::Bullets => write!(f, "bullets"),
            SkillsLayout::Inline => write!(f, "inline"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    pub skills_layout: SkillsLayout,
}

/// Lays out a normalized record. An empty record yields an empty (or nearly empty) list.
pub fn layout_record(record: &ResumeRecord, options: &LayoutOptions) -> Vec<Block> {
    let mut blocks = Vec::new();

    // Name / title block
    if !record.name.is_empty() {
        blocks.push(Block::Name(record.name.clone()));
    }
    if let Some(role) = record.role.as_deref().filter(|r| !r.is_empty()) {
        blocks.push(Block::Role(role.to_string()));
    }

    let contact = [
        record.contact.email.as_deref(),
        record.contact.phone.as_deref(),
        record.contact.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(CONTACT_SEPARATOR);
    if !contact.is_empty() {
        blocks.push(Block::Contact(contact));
    }

    if !blocks.is_empty() {
        blocks.push(Block::Spacer(10.8));
        blocks.push(Block::Divider);
        blocks.push(Block::Spacer(5.76));
    }

    if !record.summary.is_empty() {
        push_section(
            &mut blocks,
            SUMMARY_HEADING,
            vec![Block::Paragraph(record.summary.clone()), Block::Spacer(4.32)],
        );
    }

    push_section(&mut blocks, SKILLS_HEADING, skills_blocks(&record.skills, options));
    push_section(&mut blocks, EXPERIENCE_HEADING, experience_blocks(&record.experience));
    push_section(&mut blocks, EDUCATION_HEADING, education_blocks(&record.education));

    blocks
}

/// Only emits the heading when the body has something visible.
fn push_section(blocks: &mut Vec<Block>, heading: &str, body: Vec<Block>) {
    if body.iter().all(|b| matches!(b, Block::Spacer(_))) {
        return;
    }
    blocks.push(Block::Heading(heading.to_string()));
    blocks.extend(body);
}

fn skills_blocks(skills: &[String], options: &LayoutOptions) -> Vec<Block> {
    let skills: Vec<&str> = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if skills.is_empty() {
        return Vec::new();
    }

    let mut blocks = match options.skills_layout {
        SkillsLayout::Bullets => skills
            .iter()
            .map(|s| Block::Bullet(s.to_string()))
            .collect(),
        SkillsLayout::Inline => vec![Block::Paragraph(skills.join(INLINE_SKILL_SEPARATOR))],
    };
    blocks.push(Block::Spacer(4.32));
    blocks
}

fn experience_blocks(experience: &[ExperienceEntry]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for entry in experience {
        let header = entry_header(&[&entry.title, &entry.company], &entry.period);
        let points: Vec<Block> = entry
            .points
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| Block::Bullet(p.trim().to_string()))
            .collect();

        if header.is_none() && points.is_empty() {
            continue;
        }
        blocks.extend(header.map(Block::EntryHeader));
        blocks.extend(points);
        blocks.push(Block::Spacer(2.88));
    }
    blocks
}

fn education_blocks(education: &[EducationEntry]) -> Vec<Block> {
    education
        .iter()
        .filter_map(|e| entry_header(&[&e.degree, &e.institution], &e.year))
        .map(Block::EntryHeader)
        .collect()
}

/// Joins the non-empty parts with an em dash and appends `(suffix)` when present.
/// A lone suffix is still shown so a dated entry is not lost.
fn entry_header(parts: &[&str], suffix: &str) -> Option<String> {
    let main = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(HEADER_SEPARATOR);
    let suffix = suffix.trim();

    match (main.is_empty(), suffix.is_empty()) {
        (true, true) => None,
        (false, true) => Some(main),
        (true, false) => Some(format!("({suffix})")),
        (false, false) => Some(format!("{main} ({suffix})")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Plain-text mode
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Heading,
    Bullet,
    Body,
}

/// Heuristic line classification for free-form AI text.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    // Same marker rule as `strip_bullet_marker`: `**Bold**` and `-5%` are not bullets.
    if strip_bullet_marker(trimmed).len() < trimmed.len() {
        return LineKind::Bullet;
    }
    let cleaned = clean_text(trimmed);
    let has_letter = cleaned.chars().any(char::is_alphabetic);
    let is_upper = has_letter && !cleaned.chars().any(char::is_lowercase);
    if is_upper || cleaned.ends_with(':') || trimmed.starts_with('#') {
        return LineKind::Heading;
    }
    LineKind::Body
}

/// Lays out raw AI text line by line: headings, bullets, paragraphs, gaps.
pub fn layout_text(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    for line in raw.lines() {
        let block = match classify_line(line) {
            LineKind::Blank => Block::Spacer(6.0),
            LineKind::Bullet => Block::Bullet(clean_text(strip_bullet_marker(line))),
            LineKind::Heading => Block::Heading(clean_text(line.trim().trim_start_matches('#'))),
            LineKind::Body => Block::Paragraph(clean_text(line)),
        };
        // Repeated blank lines collapse into one gap; a cleaned-away line vanishes.
        match &block {
            Block::Spacer(_) if matches!(blocks.last(), None | Some(Block::Spacer(_))) => {}
            Block::Bullet(t) | Block::Heading(t) | Block::Paragraph(t) if t.is_empty() => {}
            _ => blocks.push(block),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Contact;

    fn full_record() -> ResumeRecord {
        ResumeRecord {
            name: "Jane Doe".to_string(),
            contact: Contact {
                email: Some("jane@x.com".to_string()),
                phone: Some("555-0100".to_string()),
                location: None,
            },
            role: Some("Backend Engineer".to_string()),
            summary: "Builds reliable services.".to_string(),
            skills: vec!["Go".to_string(), "SQL".to_string()],
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                period: "2019–2023".to_string(),
                points: vec!["Cut latency 40%".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "BSc CS".to_string(),
                institution: "MIT".to_string(),
                year: "2018".to_string(),
            }],
        }
    }

    fn headings(blocks: &[Block]) -> Vec<&str> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect()
    }

    fn section_bullets<'a>(blocks: &'a [Block], heading: &str) -> Vec<&'a str> {
        blocks
            .iter()
            .skip_while(|b| !matches!(b, Block::Heading(h) if h == heading))
            .skip(1)
            .take_while(|b| !matches!(b, Block::Heading(_)))
            .filter_map(|b| match b {
                Block::Bullet(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_record_has_sections_in_fixed_order() {
        let blocks = layout_record(&full_record(), &LayoutOptions::default());
        assert_eq!(
            headings(&blocks),
            vec![SUMMARY_HEADING, SKILLS_HEADING, EXPERIENCE_HEADING, EDUCATION_HEADING]
        );
        assert_eq!(blocks[0], Block::Name("Jane Doe".to_string()));
        assert_eq!(blocks[1], Block::Role("Backend Engineer".to_string()));
        assert_eq!(blocks[2], Block::Contact("jane@x.com  |  555-0100".to_string()));
        assert!(blocks.contains(&Block::Divider));
    }

    #[test]
    fn test_entry_headers() {
        let blocks = layout_record(&full_record(), &LayoutOptions::default());
        assert!(blocks.contains(&Block::EntryHeader("Engineer — Acme (2019–2023)".to_string())));
        assert!(blocks.contains(&Block::EntryHeader("BSc CS — MIT (2018)".to_string())));
        assert_eq!(section_bullets(&blocks, EXPERIENCE_HEADING), vec!["Cut latency 40%"]);
    }

    #[test]
    fn test_empty_fields_omit_their_sections() {
        let record = ResumeRecord {
            summary: String::new(),
            experience: vec![],
            ..full_record()
        };
        let blocks = layout_record(&record, &LayoutOptions::default());
        assert_eq!(headings(&blocks), vec![SKILLS_HEADING, EDUCATION_HEADING]);
    }

    #[test]
    fn test_blank_entries_do_not_produce_a_heading() {
        let record = ResumeRecord {
            skills: vec!["  ".to_string()],
            experience: vec![ExperienceEntry::default()],
            education: vec![EducationEntry::default()],
            ..full_record()
        };
        let blocks = layout_record(&record, &LayoutOptions::default());
        assert_eq!(headings(&blocks), vec![SUMMARY_HEADING]);
    }

    #[test]
    fn test_fallback_scenario_two_skill_bullets_and_no_experience() {
        let record = ResumeRecord {
            name: "Jane Doe".to_string(),
            contact: Contact {
                email: Some("jane@x.com".to_string()),
                ..Default::default()
            },
            skills: vec!["Go".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let blocks = layout_record(&record, &LayoutOptions::default());
        assert_eq!(section_bullets(&blocks, SKILLS_HEADING), vec!["Go", "SQL"]);
        assert!(!headings(&blocks).contains(&EXPERIENCE_HEADING));
    }

    #[test]
    fn test_inline_skills_layout() {
        let options = LayoutOptions {
            skills_layout: SkillsLayout::Inline,
        };
        let blocks = layout_record(&full_record(), &options);
        assert!(blocks.contains(&Block::Paragraph("Go  •  SQL".to_string())));
        assert!(section_bullets(&blocks, SKILLS_HEADING).is_empty());
    }

    #[test]
    fn test_missing_period_drops_parentheses() {
        assert_eq!(entry_header(&["Dev", "Acme"], ""), Some("Dev — Acme".to_string()));
        assert_eq!(entry_header(&["", "Acme"], "2020"), Some("Acme (2020)".to_string()));
        assert_eq!(entry_header(&["", ""], "2020"), Some("(2020)".to_string()));
        assert_eq!(entry_header(&["", " "], ""), None);
    }

    #[test]
    fn test_empty_record_lays_out_to_nothing() {
        assert!(layout_record(&ResumeRecord::default(), &LayoutOptions::default()).is_empty());
    }

    #[test]
    fn test_skills_layout_parses() {
        assert_eq!("INLINE".parse::<SkillsLayout>().unwrap(), SkillsLayout::Inline);
        assert_eq!("bullets".parse::<SkillsLayout>().unwrap(), SkillsLayout::Bullets);
        assert!("columns".parse::<SkillsLayout>().is_err());
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("EXPERIENCE"), LineKind::Heading);
        assert_eq!(classify_line("Skills:"), LineKind::Heading);
        assert_eq!(classify_line("## Education"), LineKind::Heading);
        assert_eq!(classify_line("- Shipped v2"), LineKind::Bullet);
        assert_eq!(classify_line("* Led migration"), LineKind::Bullet);
        assert_eq!(classify_line("• Mentored"), LineKind::Bullet);
        assert_eq!(classify_line("Jane Doe"), LineKind::Body);
        assert_eq!(classify_line("2019 - 2023"), LineKind::Body);
    }

    #[test]
    fn test_markdown_bold_heading_and_signed_numbers_are_not_bullets() {
        assert_eq!(classify_line("**EXPERIENCE**"), LineKind::Heading);
        assert_eq!(classify_line("-5% churn"), LineKind::Body);
        assert_eq!(classify_line("*Italic* intro"), LineKind::Body);
        assert_eq!(
            layout_text("**EXPERIENCE**\n-5% churn\n-  Cut costs"),
            vec![
                Block::Heading("EXPERIENCE".to_string()),
                Block::Paragraph("-5% churn".to_string()),
                Block::Bullet("Cut costs".to_string()),
            ]
        );
    }

    #[test]
    fn test_layout_text_maps_lines_to_blocks() {
        let raw = "Jane Doe\n\n\nCORE SKILLS\n- **Go**\n- SQL\nContact: [site](http://x)\n";
        let blocks = layout_text(raw);
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("Jane Doe".to_string()),
                Block::Spacer(6.0),
                Block::Heading("CORE SKILLS".to_string()),
                Block::Bullet("Go".to_string()),
                Block::Bullet("SQL".to_string()),
                Block::Paragraph("Contact: site".to_string()),
            ]
        );
    }
}
