//! Plain-text backend.

use super::layout::Block;

/// Renders blocks as plain text. Bullets become `- ` lines, spacers a blank line.
pub fn render_plain(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Name(t)
            | Block::Role(t)
            | Block::Contact(t)
            | Block::Heading(t)
            | Block::Paragraph(t)
            | Block::EntryHeader(t) => {
                out.push_str(t);
                out.push('\n');
            }
            Block::Bullet(t) => {
                out.push_str("- ");
                out.push_str(t);
                out.push('\n');
            }
            Block::Divider => {}
            Block::Spacer(_) => {
                if !out.is_empty() && !out.ends_with("\n\n") {
                    out.push('\n');
                }
            }
        }
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}
