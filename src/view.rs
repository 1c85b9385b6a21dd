use anyhow::{Result, anyhow};
use colored::*;
use regex::Regex;
use similar::{DiffTag, TextDiff};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::request::Side;
use crate::runner::{DisplayFormat, PairedResults};

pub const EMPTY_STATE: &str = "Press \"run\" to start the comparison.";
pub const DEFAULT_COLUMN_WIDTH: usize = 60;

static JSON_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*"\s*:"#).unwrap());
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!][^>]*>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewTab {
    #[default]
    Diff,
    ResponseA,
    ResponseB,
}

impl FromStr for ViewTab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diff" => Ok(ViewTab::Diff),
            "a" => Ok(ViewTab::ResponseA),
            "b" => Ok(ViewTab::ResponseB),
            _ => Err(anyhow!("Unknown view '{s}', expected diff, a or b")),
        }
    }
}

/// The code/diff widget boundary: two strings in, a rendered comparison out.
pub trait DocumentRenderer {
    fn render_diff(&self, left: &str, right: &str, format: DisplayFormat) -> String;
    fn render_document(&self, text: &str, format: DisplayFormat) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Equal,
    Removed,
    Added,
    Changed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DiffRow<'a> {
    kind: RowKind,
    left: Option<(usize, &'a str)>,
    right: Option<(usize, &'a str)>,
}

fn diff_rows<'a>(left: &'a str, right: &'a str) -> Vec<DiffRow<'a>> {
    let left_lines: Vec<&str> = left.lines().collect();
    let right_lines: Vec<&str> = right.lines().collect();
    let diff = TextDiff::from_slices(&left_lines, &right_lines);

    let mut rows = Vec::new();
    for op in diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        let kind = match tag {
            DiffTag::Equal => RowKind::Equal,
            DiffTag::Delete => RowKind::Removed,
            DiffTag::Insert => RowKind::Added,
            DiffTag::Replace => RowKind::Changed,
        };
        let len = old_range.len().max(new_range.len());
        for offset in 0..len {
            let old_index = old_range.start + offset;
            let new_index = new_range.start + offset;
            rows.push(DiffRow {
                kind,
                left: (old_index < old_range.end).then(|| (old_index + 1, left_lines[old_index])),
                right: (new_index < new_range.end)
                    .then(|| (new_index + 1, right_lines[new_index])),
            });
        }
    }
    rows
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Side-by-side renderer for a terminal.
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    width: usize,
    color: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        TerminalRenderer::new(DEFAULT_COLUMN_WIDTH, true)
    }
}

impl TerminalRenderer {
    pub fn new(width: usize, color: bool) -> Self {
        TerminalRenderer {
            width: width.max(8),
            color,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn highlight(&self, line: &str, format: DisplayFormat) -> String {
        if !self.color {
            return line.to_string();
        }
        let (pattern, color) = match format {
            DisplayFormat::Json => (&*JSON_KEY, Color::Cyan),
            DisplayFormat::Html => (&*HTML_TAG, Color::Blue),
        };
        pattern
            .replace_all(line, |caps: &regex::Captures| caps[0].color(color).to_string())
            .into_owned()
    }

    /// Padding is measured on the raw text; `shown` may carry colour codes.
    fn cell(
        &self,
        side: Option<(usize, &str)>,
        chunk: usize,
        text: &str,
        shown: &str,
        marker: char,
    ) -> String {
        let number = match (side, chunk) {
            (Some((n, _)), 0) => format!("{n:>4}"),
            _ => "    ".to_string(),
        };
        let marker = if side.is_some() && chunk == 0 { marker } else { ' ' };
        let padding = self.width.saturating_sub(text.chars().count());
        format!("{number} {marker} {shown}{}", " ".repeat(padding))
    }
}

impl DocumentRenderer for TerminalRenderer {
    fn render_diff(&self, left: &str, right: &str, format: DisplayFormat) -> String {
        let mut out = Vec::new();
        for row in diff_rows(left, right) {
            let (left_marker, right_marker, left_color, right_color) = match row.kind {
                RowKind::Equal => (' ', ' ', None, None),
                RowKind::Removed => ('-', ' ', Some(Color::Red), None),
                RowKind::Added => (' ', '+', None, Some(Color::Green)),
                RowKind::Changed => ('~', '~', Some(Color::Red), Some(Color::Green)),
            };
            let left_chunks = wrap(row.left.map(|(_, t)| t).unwrap_or_default(), self.width);
            let right_chunks = wrap(row.right.map(|(_, t)| t).unwrap_or_default(), self.width);
            let height = left_chunks.len().max(right_chunks.len());

            for chunk in 0..height {
                let left_text = left_chunks.get(chunk).map(String::as_str).unwrap_or_default();
                let right_text = right_chunks.get(chunk).map(String::as_str).unwrap_or_default();
                // Changed lines are painted whole, so only equal lines get syntax colour.
                let (left_shown, right_shown) = if row.kind == RowKind::Equal {
                    (self.highlight(left_text, format), self.highlight(right_text, format))
                } else {
                    (left_text.to_string(), right_text.to_string())
                };
                let mut left_cell =
                    self.cell(row.left, chunk, left_text, &left_shown, left_marker);
                let mut right_cell =
                    self.cell(row.right, chunk, right_text, &right_shown, right_marker);
                if let (Some(color), Some(_)) = (left_color, row.left) {
                    left_cell = self.paint(&left_cell, color);
                }
                if let (Some(color), Some(_)) = (right_color, row.right) {
                    right_cell = self.paint(&right_cell, color);
                }
                out.push(format!("{left_cell} │ {right_cell}").trim_end().to_string());
            }
        }
        out.join("\n")
    }

    fn render_document(&self, text: &str, format: DisplayFormat) -> String {
        text.lines()
            .enumerate()
            .map(|(i, line)| format!("{:>4}  {}", i + 1, self.highlight(line, format)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Read-only presentation of the latest comparison.
#[derive(Debug, Clone, Default)]
pub struct ComparisonView {
    results: Option<PairedResults>,
    tab: ViewTab,
}

impl ComparisonView {
    pub fn results(&self) -> Option<&PairedResults> {
        self.results.as_ref()
    }

    pub fn display_format(&self) -> DisplayFormat {
        self.results
            .as_ref()
            .map(|r| r.display_format)
            .unwrap_or_default()
    }

    pub fn tab(&self) -> ViewTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: ViewTab) {
        self.tab = tab;
    }

    /// Replaces both results at once.
    pub fn show(&mut self, results: PairedResults) {
        self.results = Some(results);
    }

    pub fn render_status_card(&self, side: Side, color: bool) -> String {
        let result = self.results.as_ref().map(|r| r.get(side));
        let label = side.label();
        let label = if color {
            label.bold().to_string()
        } else {
            label.to_string()
        };

        let Some(result) = result else {
            return format!("{label}  -");
        };

        let status_text = if result.is_failure() {
            "no response".to_string()
        } else {
            result.status.to_string()
        };
        let status_text = match (color, result.is_success()) {
            (false, _) => status_text,
            (true, true) => status_text.green().bold().to_string(),
            (true, false) => status_text.red().bold().to_string(),
        };

        if result.duration_ms > 0 {
            format!("{label}  {status_text}  {}ms", result.duration_ms)
        } else {
            format!("{label}  {status_text}")
        }
    }

    pub fn render_status_cards(&self, color: bool) -> String {
        format!(
            "{}\n{}",
            self.render_status_card(Side::A, color),
            self.render_status_card(Side::B, color)
        )
    }

    /// Renders `tab` without changing the selected one.
    pub fn render_tab(&self, tab: ViewTab, renderer: &dyn DocumentRenderer) -> String {
        let format = self.display_format();
        let (title, body) = match (tab, &self.results) {
            (ViewTab::Diff, Some(r)) => (
                "Left: Original vs Right: Others".to_string(),
                renderer.render_diff(&r.result_a.data, &r.result_b.data, format),
            ),
            (ViewTab::ResponseA, Some(r)) => (
                "Original Server Response".to_string(),
                renderer.render_document(&r.result_a.data, format),
            ),
            (ViewTab::ResponseB, Some(r)) => (
                "Others Server Response".to_string(),
                renderer.render_document(&r.result_b.data, format),
            ),
            (_, None) => return EMPTY_STATE.to_string(),
        };
        format!("{title}  [Format: {format}]\n{body}")
    }

    pub fn render(&self, renderer: &dyn DocumentRenderer, color: bool) -> String {
        format!(
            "{}\n\n{}",
            self.render_status_cards(color),
            self.render_tab(self.tab, renderer)
        )
    }
}
