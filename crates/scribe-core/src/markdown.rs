//! Markdown rendering for post bodies and feed descriptions.

use pulldown_cmark::{CowStr, Event, Parser, Tag, html};

const ELLIPSIS: &str = "…";

/// Render markdown to HTML.
pub fn to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new(markdown));
    out
}

/// Render markdown to HTML keeping at most `max_words` words of text.
///
/// Elements still open at the cut are closed so the fragment stays
/// well-formed, and an ellipsis marks the cut.
pub fn to_html_truncated(markdown: &str, max_words: usize) -> String {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut open: Vec<Tag<'_>> = Vec::new();
    let mut words = 0usize;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(tag) => {
                open.push(tag.clone());
                events.push(Event::Start(tag));
            }
            Event::End(end) => {
                open.pop();
                events.push(Event::End(end));
            }
            Event::Text(text) | Event::Code(text)
                if words + text.split_whitespace().count() > max_words =>
            {
                let kept = cut_after_words(&text, max_words - words);
                events.push(Event::Text(CowStr::from(format!("{kept}{ELLIPSIS}"))));
                for tag in open.iter().rev() {
                    events.push(Event::End(tag.to_end()));
                }
                break;
            }
            Event::Text(text) => {
                words += text.split_whitespace().count();
                events.push(Event::Text(text));
            }
            Event::Code(text) => {
                words += text.split_whitespace().count();
                events.push(Event::Code(text));
            }
            other => events.push(other),
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Prefix of `text` ending right after its `keep`-th word.
fn cut_after_words(text: &str, keep: usize) -> &str {
    if keep == 0 {
        return "";
    }

    let mut seen = 0;
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word && seen == keep {
                return &text[..i];
            }
            in_word = false;
        } else if !in_word {
            in_word = true;
            seen += 1;
        }
    }
    text
}
