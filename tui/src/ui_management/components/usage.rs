use ratatui::{
    style::Stylize,
    text::{Line, Span, Text},
};

/// A key binding and what it does
#[derive(Debug, Clone)]
pub struct UsageInfoLine {
    pub keys: Vec<&'static str>,
    pub description: String,
}

impl UsageInfoLine {
    pub fn new(keys: &[&'static str], description: impl Into<String>) -> Self {
        UsageInfoLine {
            keys: keys.to_vec(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UsageInfo {
    pub description: Option<String>,
    pub lines: Vec<UsageInfoLine>,
}

pub trait HasUsageInfo {
    fn usage_info(&self) -> UsageInfo;
}

fn key_to_span<'a>(key: &str) -> Span<'a> {
    Span::from(format!("({})", key)).bold()
}

pub fn usage_to_text<'a>(usage: UsageInfo) -> Text<'a> {
    let mut lines: Vec<Line> = vec![];
    if let Some(description) = usage.description {
        lines.push(Line::from(description));
    }

    for line in usage.lines {
        let mut spans: Vec<Span> = Vec::with_capacity(line.keys.len() * 2 + 1);

        for (idx, key) in line.keys.iter().enumerate() {
            if idx > 0 {
                spans.push(if idx + 1 == line.keys.len() {
                    " or ".into()
                } else {
                    ", ".into()
                });
            }
            spans.push(key_to_span(key));
        }

        spans.push(Span::from(format!(" {}", line.description)));

        lines.push(Line::from(spans));
    }

    Text::from(lines)
}
