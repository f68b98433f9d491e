//! Line-oriented renderer for the markdown subset articles are written in.
//! Recognizes `## ` / `### ` headings, `- ` list items, blank spacers and
//! `**bold**` spans inside paragraphs. Everything else passes through as
//! literal paragraph text.

pub mod text;

use regex::Regex;

/// One inline fragment of a paragraph line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// One rendered block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    List(Vec<String>),
    Spacer,
    Paragraph(Vec<Inline>),
}

/// Parse a document line by line. Consecutive `- ` lines collapse into a
/// single `List` block; a `# ` title line is dropped because the view shows
/// the article title separately. No nested block syntax.
pub fn render_markdown(md: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut list: Vec<String> = Vec::new();

    for line in md.split('\n') {
        if let Some(item) = line.strip_prefix("- ") {
            list.push(item.to_string());
            continue;
        }
        if !list.is_empty() {
            blocks.push(Block::List(std::mem::take(&mut list)));
        }

        if let Some(text) = line.strip_prefix("## ") {
            blocks.push(Block::Heading {
                level: 2,
                text: text.to_string(),
            });
        } else if let Some(text) = line.strip_prefix("### ") {
            blocks.push(Block::Heading {
                level: 3,
                text: text.to_string(),
            });
        } else if line.starts_with("# ") {
            // Title line, shown separately by the view.
        } else if line.trim().is_empty() {
            blocks.push(Block::Spacer);
        } else {
            blocks.push(Block::Paragraph(split_bold(line)));
        }
    }
    if !list.is_empty() {
        blocks.push(Block::List(list));
    }

    blocks
}

/// Split one line into alternating plain and bold fragments. Only complete
/// non-greedy `**` pairs become bold; leftover markers stay literal text.
/// Empty plain fragments between adjacent pairs are dropped.
pub fn split_bold(line: &str) -> Vec<Inline> {
    let re = Regex::new(r"\*\*.*?\*\*").expect("valid regex");
    let mut fragments = Vec::new();
    let mut last = 0;

    for m in re.find_iter(line) {
        if m.start() > last {
            fragments.push(Inline::Text(line[last..m.start()].to_string()));
        }
        fragments.push(Inline::Bold(line[m.start() + 2..m.end() - 2].to_string()));
        last = m.end();
    }
    if last < line.len() {
        fragments.push(Inline::Text(line[last..].to_string()));
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn bold(s: &str) -> Inline {
        Inline::Bold(s.to_string())
    }

    #[test]
    fn renders_a_typical_article_body() {
        let blocks = render_markdown("## A\n- one\n- two\nplain **bold** text");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    text: "A".to_string()
                },
                Block::List(vec!["one".to_string(), "two".to_string()]),
                Block::Paragraph(vec![text("plain "), bold("bold"), text(" text")]),
            ]
        );
    }

    #[test]
    fn title_lines_are_suppressed() {
        let blocks = render_markdown("# Title\nbody");
        assert_eq!(blocks, vec![Block::Paragraph(vec![text("body")])]);
    }

    #[test]
    fn heading_levels_are_distinguished() {
        let blocks = render_markdown("## Two\n### Three");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    text: "Two".to_string()
                },
                Block::Heading {
                    level: 3,
                    text: "Three".to_string()
                },
            ]
        );
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        let blocks = render_markdown("##Tight");
        assert_eq!(blocks, vec![Block::Paragraph(vec![text("##Tight")])]);
    }

    #[test]
    fn blank_and_whitespace_lines_become_spacers() {
        let blocks = render_markdown("a\n\n   \nb");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![text("a")]),
                Block::Spacer,
                Block::Spacer,
                Block::Paragraph(vec![text("b")]),
            ]
        );
    }

    #[test]
    fn contiguous_items_share_one_list() {
        let blocks = render_markdown("- a\n- b\n- c");
        assert_eq!(
            blocks,
            vec![Block::List(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string()
            ])]
        );
    }

    #[test]
    fn any_non_list_line_splits_the_group() {
        let blocks = render_markdown("- a\n\n- b\n## H\n- c");
        assert_eq!(
            blocks,
            vec![
                Block::List(vec!["a".to_string()]),
                Block::Spacer,
                Block::List(vec!["b".to_string()]),
                Block::Heading {
                    level: 2,
                    text: "H".to_string()
                },
                Block::List(vec!["c".to_string()]),
            ]
        );
    }

    #[test]
    fn trailing_list_is_flushed() {
        let blocks = render_markdown("intro\n- last");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![text("intro")]),
                Block::List(vec!["last".to_string()]),
            ]
        );
    }

    #[test]
    fn carriage_returns_ride_along() {
        let blocks = render_markdown("## A\r\nplain\r\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 2,
                    text: "A\r".to_string()
                },
                Block::Paragraph(vec![text("plain\r")]),
                Block::Spacer,
            ]
        );
    }

    #[test]
    fn bold_spans_alternate_with_plain_text() {
        assert_eq!(
            split_bold("a **b** c **d** e"),
            vec![text("a "), bold("b"), text(" c "), bold("d"), text(" e")]
        );
        assert_eq!(split_bold("**lead** tail"), vec![bold("lead"), text(" tail")]);
        assert_eq!(split_bold("head **trail**"), vec![text("head "), bold("trail")]);
    }

    #[test]
    fn adjacent_pairs_drop_the_empty_gap() {
        assert_eq!(split_bold("**a****b**"), vec![bold("a"), bold("b")]);
    }

    #[test]
    fn four_markers_make_an_empty_bold() {
        assert_eq!(split_bold("****"), vec![bold("")]);
    }

    #[test]
    fn unpaired_markers_stay_literal() {
        assert_eq!(split_bold("ends **open"), vec![text("ends **open")]);
        assert_eq!(
            split_bold("**a** then **"),
            vec![bold("a"), text(" then **")]
        );
        assert_eq!(split_bold("** alone"), vec![text("** alone")]);
    }

    #[test]
    fn no_other_syntax_is_recognized() {
        assert_eq!(
            split_bold("[link](url) and `code` and *single*"),
            vec![text("[link](url) and `code` and *single*")]
        );
        let blocks = render_markdown("> quoted");
        assert_eq!(blocks, vec![Block::Paragraph(vec![text("> quoted")])]);
    }
}
