// All LLM prompt templates for resume generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Structured resume prompt.
/// Replace: {json_only}, {no_markdown}, {inference}, and every `{field}` from `ResumeInput`.
pub const RESUME_JSON_PROMPT_TEMPLATE: &str = r#"You are a resume formatter. {json_only}
Use this exact schema:
{
  "name": "Full Name",
  "role": "Target Job Title",
  "contact": {"email": "email", "phone": "phone", "location": "City, Country"},
  "summary": "1-3 lines, concise.",
  "skills": ["Skill 1", "Skill 2", "Skill 3"],
  "experience": [
    {"title": "Job Title", "company": "Company", "period": "YYYY–YYYY", "points": ["result/impact", "action + metric"]}
  ],
  "education": [
    {"degree": "Degree", "institution": "Institution", "year": "Year"}
  ]
}

RULES:
1. Fill the fields using the user data below.
2. {no_markdown}
3. {inference}
4. Experience points are plain sentences without bullet characters.

User data:
Name: {name}
Email: {email}
Phone: {phone}
Target role: {role}
Location: {location}
Summary: {summary_hint}
Skills (comma): {skills_raw}
Experience: {experience_raw}
Education: {education_raw}"#;

/// Plain-text resume prompt.
/// Replace: {no_markdown}, {inference}, and every `{field}` from `ResumeInput`.
pub const RESUME_TEXT_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer. Write a polished, ATS-friendly resume as plain text.

FORMAT:
- Section headings in UPPER CASE on their own line (PROFESSIONAL SUMMARY, CORE SKILLS, EXPERIENCE, EDUCATION).
- Bullet points start with "- ".
- Start with the candidate name on the first line and the contact details on the second.

RULES:
1. {no_markdown}
2. {inference}
3. Return only the resume text, no commentary.

User data:
Name: {name}
Email: {email}
Phone: {phone}
Target role: {role}
Location: {location}
Summary: {summary_hint}
Skills (comma): {skills_raw}
Experience: {experience_raw}
Education: {education_raw}"#;
