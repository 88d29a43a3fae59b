// Shared prompt fragments.
// Each pipeline that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Return JSON ONLY. No prose. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Formatting rule shared by every resume prompt.
pub const NO_MARKDOWN_INSTRUCTION: &str = "Do NOT use markdown links, bold, italics or \
    underline markers. Do NOT prefix emails with mailto:.";

/// Gap-filling rule. Wording may be inferred; facts may not.
pub const INFERENCE_INSTRUCTION: &str = "If a field is missing, infer reasonably from the \
    other user data (for example a summary from the skills and role). \
    Never invent employers, job titles, dates, institutions or metrics that the user did \
    not provide. No placeholders if the user gave data.";
