//! Plain-text display backend for rendered blocks. Display only; the
//! parsing contract lives in the crate root.

use crate::{Block, Inline};

/// Render blocks for a terminal: headings underlined, list items numbered,
/// bold fragments wrapped in single asterisks.
pub fn render_text(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let rule = if *level == 2 { '=' } else { '-' };
                out.push_str(text);
                out.push('\n');
                out.extend(std::iter::repeat(rule).take(text.chars().count()));
                out.push('\n');
            }
            Block::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&format!("{}. {}\n", i + 1, item));
                }
            }
            Block::Spacer => out.push('\n'),
            Block::Paragraph(fragments) => {
                for fragment in fragments {
                    match fragment {
                        Inline::Text(t) => out.push_str(t),
                        Inline::Bold(t) => {
                            out.push('*');
                            out.push_str(t);
                            out.push('*');
                        }
                    }
                }
                out.push('\n');
            }
        }
    }
    out
}
