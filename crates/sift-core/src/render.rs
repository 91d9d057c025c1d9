//! Markdown to plain text rendering for excerpts

use pulldown_cmark::{Event, Options, Parser, TagEnd};

/// Turns a (possibly partial) markdown fragment into plain text
pub trait MarkdownRenderer: Send + Sync {
    fn to_plain_text(&self, markdown: &str) -> String;
}

/// pulldown-cmark backed renderer that keeps only the readable text
#[derive(Debug, Clone, Copy)]
pub struct PlainTextRenderer {
    options: Options,
}

impl PlainTextRenderer {
    pub const fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        Self::new(options)
    }
}

impl MarkdownRenderer for PlainTextRenderer {
    fn to_plain_text(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len());
        for event in Parser::new_ext(markdown, self.options) {
            match event {
                Event::Text(text) | Event::Code(text) => out.push_str(&text),
                Event::SoftBreak | Event::HardBreak | Event::Rule => out.push(' '),
                // Block ends would otherwise glue neighbouring words together
                Event::End(
                    TagEnd::Paragraph
                    | TagEnd::Heading(_)
                    | TagEnd::Item
                    | TagEnd::CodeBlock
                    | TagEnd::TableCell,
                ) => out.push(' '),
                _ => {}
            }
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        PlainTextRenderer::default().to_plain_text(markdown)
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render("the quick brown fox jumps"), "the quick brown fox jumps");
    }

    #[test]
    fn markup_is_dropped() {
        assert_eq!(
            render("# Title\n\nSome **bold** and [a link](https://example.com)."),
            "Title Some bold and a link."
        );
    }

    #[test]
    fn blocks_are_separated_by_spaces() {
        assert_eq!(render("- one\n- two\n\n`code`"), "one two code");
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render(""), "");
    }
}
