//! Text cleaning: strips markdown remnants that models emit despite instructions.
//!
//! Every pass only removes characters, so iterating to a fixpoint terminates and
//! makes `clean_text` idempotent.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

struct CleanPatterns {
    link: Regex,
    underline_tag: Regex,
    mailto: Regex,
    double_underscore: Regex,
    underscore_emphasis: Regex,
    spaces: Regex,
}

fn patterns() -> &'static CleanPatterns {
    static PATTERNS: OnceLock<CleanPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CleanPatterns {
        // [text](url) and ![alt](url)
        link: Regex::new(r"!?\[([^\]]*)\]\(([^)]*)\)").unwrap(),
        underline_tag: Regex::new(r"(?i)</?u>").unwrap(),
        mailto: Regex::new(r"(?i)mailto:").unwrap(),
        double_underscore: Regex::new(r"_{2,}").unwrap(),
        // _word_ only at word boundaries, so snake_case and emails survive
        underscore_emphasis: Regex::new(r"(^|[\s(\[])_([^_\s][^_]*?)_($|[\s.,;:!?)\]])").unwrap(),
        spaces: Regex::new(r"[ \t]{2,}").unwrap(),
    })
}

/// Removes markdown links, emphasis markers and `mailto:` from `input`.
pub fn clean_text(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = clean_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_pass(input: &str) -> String {
    let p = patterns();
    let text = p.link.replace_all(input, "${1}");
    let text = p.underline_tag.replace_all(&text, "");
    let text = p.mailto.replace_all(&text, "");
    let text = text.replace('*', "");
    let text = p.double_underscore.replace_all(&text, "");
    let text = p.underscore_emphasis.replace_all(&text, "${1}${2}${3}");
    let text = p.spaces.replace_all(&text, " ");
    text.trim().to_string()
}

/// Cleans every string inside `value`, recursing through arrays and objects.
pub fn clean_value(value: &mut Value) {
    match value {
        Value::String(s) => *s = clean_text(s),
        Value::Array(items) => items.iter_mut().for_each(clean_value),
        Value::Object(map) => map.values_mut().for_each(clean_value),
        _ => {}
    }
}

const BULLET_MARKERS: &[char] = &['•', '·', '▪', '‣', '-', '–', '—', '*'];

/// Strips leading bullet glyphs (`• `, `- `, `* `), possibly repeated.
/// A marker only counts when followed by whitespace, so `-5% latency` is kept.
pub fn strip_bullet_marker(line: &str) -> &str {
    let mut rest = line.trim_start();
    loop {
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(marker), Some(next)) if BULLET_MARKERS.contains(&marker) && next.is_whitespace() => {
                rest = rest[marker.len_utf8()..].trim_start();
            }
            (Some(marker), None) if BULLET_MARKERS.contains(&marker) => return "",
            _ => return rest,
        }
    }
}
