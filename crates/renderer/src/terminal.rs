//! Plain-text rendering of views for terminal front ends.

use std::fmt::Write as _;

use crate::{
    markdown::{Block, Document, Inline},
    view::{BadgeTone, PreviewPanel, ResultView, SubmitControl},
};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalStyle {
    pub color: bool,
}

impl TerminalStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn colored() -> Self {
        Self { color: true }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

pub fn render_view(view: &ResultView, style: TerminalStyle) -> String {
    match view {
        ResultView::Placeholder { message } => format!("{message}\n"),
        ResultView::Loading { label } => format!("[ {label} ]\n"),
        ResultView::ErrorBanner { title, message, .. } => {
            format!("{}: {message}\n", style.paint(RED, title))
        }
        ResultView::Report { badge, document } => {
            let marker = match badge.tone {
                BadgeTone::Pass => style.paint(GREEN, &format!("[+ {}]", badge.label)),
                BadgeTone::Fail => style.paint(RED, &format!("[! {}]", badge.label)),
            };
            let mut out = format!("Overall Assessment: {marker}\n\n");
            out.push_str(&render_document(document, style));
            out
        }
    }
}

pub fn render_submit_control(control: &SubmitControl) -> String {
    if control.enabled {
        format!("[{}]", control.label)
    } else {
        format!("({})", control.label)
    }
}

pub fn render_preview_panel(panel: &PreviewPanel) -> String {
    match panel {
        PreviewPanel::Empty { message } => message.to_string(),
        PreviewPanel::Image { file_name, uri } => format!("{file_name} <{uri}>"),
    }
}

pub fn render_document(document: &Document, style: TerminalStyle) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        render_block(block, 0, style, &mut out);
        out.push('\n');
    }
    out
}

fn render_block(block: &Block, indent: usize, style: TerminalStyle, out: &mut String) {
    let pad = " ".repeat(indent);
    match block {
        Block::Heading { level, content } => {
            let hashes = "#".repeat(usize::from(*level));
            let text = render_inlines(content);
            let _ = writeln!(out, "{pad}{}", style.paint(BOLD, &format!("{hashes} {text}")));
        }
        Block::Paragraph(content) => {
            for line in render_inlines(content).lines() {
                let _ = writeln!(out, "{pad}{line}");
            }
        }
        Block::CodeBlock { language, code } => {
            let _ = writeln!(out, "{pad}```{}", language.as_deref().unwrap_or_default());
            for line in code.lines() {
                let _ = writeln!(out, "{pad}{line}");
            }
            let _ = writeln!(out, "{pad}```");
        }
        Block::List {
            ordered,
            start,
            items,
        } => {
            let first = start.unwrap_or(1);
            for (idx, item) in items.iter().enumerate() {
                let marker = if *ordered {
                    format!("{}. ", first + idx as u64)
                } else {
                    "- ".to_string()
                };
                render_item(item, indent, &marker, style, out);
            }
        }
    }
}

fn render_item(item: &[Block], indent: usize, marker: &str, style: TerminalStyle, out: &mut String) {
    let pad = " ".repeat(indent);
    let child_indent = indent + marker.len();
    let mut marker_written = false;
    for block in item {
        match block {
            Block::Paragraph(content) if !marker_written => {
                let text = render_inlines(content);
                let mut lines = text.lines();
                let _ = writeln!(out, "{pad}{marker}{}", lines.next().unwrap_or_default());
                for line in lines {
                    let _ = writeln!(out, "{}{line}", " ".repeat(child_indent));
                }
                marker_written = true;
            }
            other => {
                if !marker_written {
                    let _ = writeln!(out, "{pad}{}", marker.trim_end());
                    marker_written = true;
                }
                render_block(other, child_indent, style, out);
            }
        }
    }
    if !marker_written {
        let _ = writeln!(out, "{pad}{}", marker.trim_end());
    }
}

fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => {
                let _ = write!(out, "`{code}`");
            }
            Inline::Strong(inner) => {
                let _ = write!(out, "**{}**", render_inlines(inner));
            }
            Inline::Emphasis(inner) => {
                let _ = write!(out, "*{}*", render_inlines(inner));
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}
