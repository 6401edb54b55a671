// ABOUTME: Converts markdown text into styled ratatui lines for the report and chat panes
// Works on partial input, so a half-streamed document renders without special casing

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let mut renderer = MarkdownRenderer::default();
    for event in Parser::new(text) {
        renderer.event(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    // None for bullet lists, Some(next number) for ordered ones
    lists: Vec<Option<u64>>,
    in_code_block: bool,
}

impl MarkdownRenderer {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.in_code_block => {
                let style = Style::default().fg(Color::Green);
                for line in text.lines() {
                    self.lines.push(Line::from(Span::styled(format!("  {}", line), style)));
                }
            }
            Event::Text(text) => {
                let style = self.style();
                self.spans.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                self.spans
                    .push(Span::styled(code.into_string(), Style::default().fg(Color::Yellow)));
            }
            Event::SoftBreak => {
                let style = self.style();
                self.spans.push(Span::styled(" ", style));
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(level, ..) => {
                self.flush();
                let color = if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
                    Color::Cyan
                } else {
                    Color::Yellow
                };
                self.push_style(|s| s.fg(color).add_modifier(Modifier::BOLD));
            }
            Tag::Emphasis => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            Tag::BlockQuote => {
                self.push_style(|s| s.fg(Color::Gray).add_modifier(Modifier::ITALIC));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}{}. ", indent, n);
                        *n += 1;
                        marker
                    }
                    _ => format!("{}• ", indent),
                };
                self.spans.push(Span::styled(marker, Style::default().fg(Color::Cyan)));
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading(..) => {
                self.styles.pop();
                self.flush();
                self.blank();
            }
            Tag::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Tag::Emphasis | Tag::Strong | Tag::BlockQuote => {
                self.styles.pop();
            }
            Tag::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Tag::Item => self.flush(),
            Tag::CodeBlock(_) => {
                self.in_code_block = false;
                self.blank();
            }
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, modify: impl FnOnce(Style) -> Style) {
        let style = modify(self.style());
        self.styles.push(style);
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_headings_paragraphs_and_lists() {
        let lines = render_markdown(
            "## Executive Summary\nChurn is **rising**.\n\n- Month-to-month\n- Fiber optic\n\n1. Call them\n2. Offer discounts",
        );
        assert_eq!(
            plain(&lines),
            vec![
                "Executive Summary",
                "",
                "Churn is rising.",
                "",
                "• Month-to-month",
                "• Fiber optic",
                "",
                "1. Call them",
                "2. Offer discounts",
            ]
        );
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(lines[2].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_partial_document_renders() {
        let lines = render_markdown("## Error\nFailed to generate report. Please try again.");
        assert_eq!(
            plain(&lines),
            vec!["Error", "", "Failed to generate report. Please try again."]
        );

        // Unterminated emphasis mid-stream stays literal
        let lines = render_markdown("The **key dri");
        assert_eq!(plain(&lines), vec!["The **key dri"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(render_markdown("").is_empty());
    }
}
