//! Excerpts: a short text window around the first hit, with every hit
//! highlighted.
//!
//! The window starts two words before the hit and ends about
//! `excerpt_chars` characters after it, pushed out to the end of the word it
//! lands in and then one word further. Without a body hit the window starts
//! at the top of the body and only snaps to the end of its last word.

use std::ops::Range;

use super::matcher::QueryMatcher;
use crate::config::SearchConfig;
use crate::render::MarkdownRenderer;
use crate::util::escape_html;

/// Words of leading context kept before a hit
const CONTEXT_WORDS: usize = 2;

pub struct ExcerptBuilder<'a> {
    config: &'a SearchConfig,
    renderer: &'a dyn MarkdownRenderer,
}

impl<'a> ExcerptBuilder<'a> {
    pub fn new(config: &'a SearchConfig, renderer: &'a dyn MarkdownRenderer) -> Self {
        Self { config, renderer }
    }

    /// Build the HTML-safe excerpt for `markdown`
    pub fn build(&self, markdown: &str, matcher: Option<&QueryMatcher>) -> String {
        let hit = matcher.and_then(|m| m.find(markdown));
        let window = excerpt_window(markdown, hit, self.config.excerpt_chars);
        let text = self.renderer.to_plain_text(&markdown[window.clone()]);

        let mut excerpt = match matcher {
            Some(matcher) => highlight(
                &text,
                matcher,
                &self.config.highlight_open,
                &self.config.highlight_close,
            ),
            None => escape_html(&text),
        };
        if window.end < markdown.len() {
            excerpt.push_str(&self.config.ellipsis);
        }
        excerpt
    }
}

/// Byte range of `text` an excerpt covers.
///
/// `hit` is the byte range of the first match, if the body has one.
pub fn excerpt_window(text: &str, hit: Option<Range<usize>>, window_chars: usize) -> Range<usize> {
    match hit {
        None => {
            let end = advance_chars(text, 0, window_chars);
            0..word_end(text, end)
        }
        Some(hit) => {
            let start = context_start(text, hit.start);
            let end = advance_chars(text, hit.start, window_chars).max(hit.end);
            let end = word_end(text, end);
            let end = word_end(text, skip_whitespace(text, end));
            start..end
        }
    }
}

/// Wrap every match of `matcher` in `text`, escaping everything else
pub fn highlight(text: &str, matcher: &QueryMatcher, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut cursor = 0;
    for range in matcher.find_iter(text) {
        out.push_str(&escape_html(&text[cursor..range.start]));
        out.push_str(open);
        out.push_str(&escape_html(&text[range.clone()]));
        out.push_str(close);
        cursor = range.end;
    }
    out.push_str(&escape_html(&text[cursor..]));
    out
}

/// Byte offset `count` characters after `from`, clamped to the end
fn advance_chars(text: &str, from: usize, count: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(offset, _)| from + offset)
}

/// First whitespace at or after `from`, or the end of the text
fn word_end(text: &str, from: usize) -> usize {
    text[from..]
        .find(char::is_whitespace)
        .map_or(text.len(), |offset| from + offset)
}

/// First non-whitespace at or after `from`, or the end of the text
fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .find(|c: char| !c.is_whitespace())
        .map_or(text.len(), |offset| from + offset)
}

/// Start of the word `CONTEXT_WORDS` spaces before `position`
fn context_start(text: &str, position: usize) -> usize {
    let mut spaces = 0;
    for (offset, ch) in text[..position].char_indices().rev() {
        if ch.is_whitespace() {
            spaces += 1;
            if spaces > CONTEXT_WORDS {
                return offset + ch.len_utf8();
            }
        }
    }
    0
}
