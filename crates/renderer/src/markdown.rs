//! Markdown narrative to structured blocks.
//!
//! Supported structure: headings (deeper levels fold into level 3), paragraphs,
//! ordered and unordered lists, inline code, code blocks, strong and emphasis.
//! Everything else contributes its text only.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph(Vec<Inline>),
    List {
        ordered: bool,
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Every heading in document order as `(level, text)`.
    pub fn headings(&self) -> Vec<(u8, String)> {
        let mut out = Vec::new();
        collect_headings(&self.blocks, &mut out);
        out
    }

    /// Text of every list item, nested items included, in document order.
    pub fn list_items(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_list_items(&self.blocks, &mut out);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(inlines, &mut out);
    out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Strong(inner) | Inline::Emphasis(inner) => push_plain_text(inner, out),
            Inline::LineBreak => out.push('\n'),
        }
    }
}

fn collect_headings(blocks: &[Block], out: &mut Vec<(u8, String)>) {
    for block in blocks {
        match block {
            Block::Heading { level, content } => out.push((*level, plain_text(content))),
            Block::List { items, .. } => {
                for item in items {
                    collect_headings(item, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_list_items(blocks: &[Block], out: &mut Vec<String>) {
    for block in blocks {
        if let Block::List { items, .. } = block {
            for item in items {
                let text = item
                    .iter()
                    .filter_map(|block| match block {
                        Block::Paragraph(content) | Block::Heading { content, .. } => {
                            Some(plain_text(content))
                        }
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                out.push(text);
                collect_list_items(item, out);
            }
        }
    }
}

pub fn render_markdown(source: &str) -> Document {
    let mut builder = Builder::new();
    for event in Parser::new_ext(source, Options::empty()) {
        builder.event(event);
    }
    builder.finish()
}

enum Leaf {
    Paragraph,
    Heading(u8),
    Code {
        language: Option<String>,
        code: String,
    },
}

struct ListFrame {
    start: Option<u64>,
    items: Vec<Vec<Block>>,
}

struct Builder {
    // Root blocks at index 0, then one entry per open list item.
    blocks: Vec<Vec<Block>>,
    lists: Vec<ListFrame>,
    leaf: Option<Leaf>,
    // Base inline run at index 0, then one entry per open strong/emphasis span.
    spans: Vec<Vec<Inline>>,
}

impl Builder {
    fn new() -> Self {
        Self {
            blocks: vec![Vec::new()],
            lists: Vec::new(),
            leaf: None,
            spans: vec![Vec::new()],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some(Leaf::Code { code, .. }) = &mut self.leaf {
                    code.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_inline(Inline::LineBreak),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_loose_text();
                self.leaf = Some(Leaf::Paragraph);
            }
            Tag::Heading { level, .. } => {
                self.flush_loose_text();
                self.leaf = Some(Leaf::Heading(heading_level(level)));
            }
            Tag::CodeBlock(kind) => {
                self.flush_loose_text();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.leaf = Some(Leaf::Code {
                    language,
                    code: String::new(),
                });
            }
            Tag::List(start) => {
                self.flush_loose_text();
                self.lists.push(ListFrame {
                    start,
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.flush_loose_text();
                self.blocks.push(Vec::new());
            }
            Tag::Emphasis | Tag::Strong => self.spans.push(Vec::new()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.leaf = None;
                let content = self.take_spans();
                if !content.is_empty() {
                    self.push_block(Block::Paragraph(content));
                }
            }
            TagEnd::Heading(_) => {
                if let Some(Leaf::Heading(level)) = self.leaf.take() {
                    let content = self.take_spans();
                    self.push_block(Block::Heading { level, content });
                }
            }
            TagEnd::CodeBlock => {
                if let Some(Leaf::Code { language, code }) = self.leaf.take() {
                    let code = code.trim_end_matches('\n').to_string();
                    self.push_block(Block::CodeBlock { language, code });
                }
            }
            TagEnd::Item => {
                self.flush_loose_text();
                if self.blocks.len() > 1 {
                    let item = self.blocks.pop().unwrap_or_default();
                    if let Some(list) = self.lists.last_mut() {
                        list.items.push(item);
                    }
                }
            }
            TagEnd::List(_) => {
                if let Some(list) = self.lists.pop() {
                    self.push_block(Block::List {
                        ordered: list.start.is_some(),
                        start: list.start,
                        items: list.items,
                    });
                }
            }
            TagEnd::Emphasis => self.close_span(Inline::Emphasis),
            TagEnd::Strong => self.close_span(Inline::Strong),
            _ => {}
        }
    }

    fn finish(mut self) -> Document {
        self.flush_loose_text();
        Document {
            blocks: self.blocks.into_iter().next().unwrap_or_default(),
        }
    }

    fn push_block(&mut self, block: Block) {
        if let Some(blocks) = self.blocks.last_mut() {
            blocks.push(block);
        }
    }

    fn push_text(&mut self, text: &str) {
        let Some(run) = self.spans.last_mut() else {
            return;
        };
        if let Some(Inline::Text(previous)) = run.last_mut() {
            previous.push_str(text);
        } else {
            run.push(Inline::Text(text.to_string()));
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        if let Some(run) = self.spans.last_mut() {
            run.push(inline);
        }
    }

    fn close_span(&mut self, wrap: fn(Vec<Inline>) -> Inline) {
        if self.spans.len() > 1 {
            let inner = self.spans.pop().unwrap_or_default();
            self.push_inline(wrap(inner));
        }
    }

    fn take_spans(&mut self) -> Vec<Inline> {
        let mut spans = std::mem::replace(&mut self.spans, vec![Vec::new()]);
        while spans.len() > 1 {
            let inner = spans.pop().unwrap_or_default();
            if let Some(parent) = spans.last_mut() {
                parent.extend(inner);
            }
        }
        spans.pop().unwrap_or_default()
    }

    // Tight list items carry their text without a paragraph wrapper.
    fn flush_loose_text(&mut self) {
        if self.leaf.is_some() {
            return;
        }
        let content = self.take_spans();
        let content = trim_inlines(content);
        if !content.is_empty() {
            self.push_block(Block::Paragraph(content));
        }
    }
}

fn trim_inlines(mut content: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(text)) = content.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Inline::Text(text)) = content.last_mut() {
        *text = text.trim_end().to_string();
    }
    content.retain(|inline| !matches!(inline, Inline::Text(text) if text.is_empty()));
    content
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        _ => 3,
    }
}

#[cfg(test)]
#[path = "tests/markdown_tests.rs"]
mod tests;
