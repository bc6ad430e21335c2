//! Narration text.
//!
//! Narration is authored as markdown (`**Rotate:** click and drag`).
//! Hosts that cannot style text use [`Narration::plain_text`]; hosts that can
//! use [`Narration::spans`]. Headings render as strong lines and list items
//! keep their `1. ` / `• ` markers.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// Styling of a run of narration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStyle {
    /// Regular text.
    Plain,
    /// `*emphasis*`.
    Emphasis,
    /// `**strong**`.
    Strong,
}

/// A run of identically styled text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationSpan {
    /// The text.
    pub text: String,
    /// Its style.
    pub style: SpanStyle,
}

/// Markdown narration for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Narration(String);

impl Narration {
    /// Wraps markdown source.
    pub fn new(markdown: impl Into<String>) -> Self {
        Self(markdown.into())
    }

    /// The markdown source.
    #[must_use]
    pub fn markdown(&self) -> &str {
        &self.0
    }

    /// Styled runs, with block and line breaks rendered as `\n`.
    #[must_use]
    pub fn spans(&self) -> Vec<NarrationSpan> {
        let mut out = SpanBuilder::default();
        let mut strong = 0_u32;
        let mut emphasis = 0_u32;
        let mut headings = 0_u32;
        // One entry per open list: the next ordinal, or `None` if bulleted.
        let mut lists: Vec<Option<u64>> = Vec::new();

        for event in Parser::new(&self.0) {
            let style = if strong > 0 || headings > 0 {
                SpanStyle::Strong
            } else if emphasis > 0 {
                SpanStyle::Emphasis
            } else {
                SpanStyle::Plain
            };
            match event {
                Event::Start(Tag::Strong) => strong += 1,
                Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
                Event::Start(Tag::Emphasis) => emphasis += 1,
                Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),
                Event::Start(Tag::Heading { .. }) => {
                    out.start_block();
                    headings += 1;
                }
                Event::End(TagEnd::Heading(_)) => headings = headings.saturating_sub(1),
                Event::Start(Tag::List(first)) => lists.push(first),
                Event::End(TagEnd::List(_)) => {
                    lists.pop();
                }
                Event::Start(Tag::Item) => {
                    let marker = match lists.last_mut() {
                        Some(Some(ordinal)) => {
                            let marker = format!("{ordinal}. ");
                            *ordinal += 1;
                            marker
                        }
                        _ => "• ".to_owned(),
                    };
                    out.marker(&marker);
                }
                Event::Start(Tag::Paragraph) => out.start_block(),
                Event::Text(text) | Event::Code(text) => out.push(&text, style),
                Event::SoftBreak | Event::HardBreak => out.push("\n", SpanStyle::Plain),
                _ => {}
            }
        }
        out.spans
    }

    /// The narration with markup stripped.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.spans().into_iter().map(|span| span.text).collect()
    }
}

#[derive(Default)]
struct SpanBuilder {
    spans: Vec<NarrationSpan>,
    // Set right after a list marker so the item's own paragraph stays on
    // the marker's line.
    after_marker: bool,
}

impl SpanBuilder {
    fn push(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        self.after_marker = false;
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(NarrationSpan {
                text: text.to_owned(),
                style,
            }),
        }
    }

    fn start_block(&mut self) {
        if self.after_marker {
            return;
        }
        if self
            .spans
            .last()
            .is_some_and(|last| !last.text.ends_with('\n'))
        {
            self.push("\n", SpanStyle::Plain);
        }
    }

    fn marker(&mut self, marker: &str) {
        self.start_block();
        self.push(marker, SpanStyle::Plain);
        self.after_marker = true;
    }
}

impl From<&str> for Narration {
    fn from(markdown: &str) -> Self {
        Self::new(markdown)
    }
}
