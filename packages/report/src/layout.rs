//! Word wrapping and pagination of a [`Report`] into plain text.

use crate::{REPORT_TITLE, Report, ReportError};

/// Default wrap column.
pub const DEFAULT_WIDTH: usize = 170;

/// Default page height in lines, footer included.
pub const DEFAULT_LINES_PER_PAGE: usize = 60;

const MIN_WIDTH: usize = 20;

/// Lines reserved at the bottom of each page for the footer.
const FOOTER_LINES: usize = 2;

/// Page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: usize,
    pub lines_per_page: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            lines_per_page: DEFAULT_LINES_PER_PAGE,
        }
    }
}

impl PageLayout {
    fn validate(self) -> Result<Self, ReportError> {
        if self.width < MIN_WIDTH {
            return Err(ReportError::Render {
                message: format!("page width {} is below the minimum of {MIN_WIDTH}", self.width),
            });
        }
        if self.lines_per_page <= FOOTER_LINES {
            return Err(ReportError::Render {
                message: format!(
                    "{} lines per page leaves no room for content",
                    self.lines_per_page
                ),
            });
        }
        Ok(self)
    }

    const fn body_lines(self) -> usize {
        self.lines_per_page - FOOTER_LINES
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub total: usize,
    pub lines: Vec<String>,
}

impl Page {
    #[must_use]
    pub fn footer(&self) -> String {
        format!("Page {} of {}", self.number, self.total)
    }

    fn write_into(&self, out: &mut String) {
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.footer());
        out.push('\n');
    }
}

/// Greedy word wrap. Words longer than `width` are split. A zero width
/// is treated as one column.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn document_lines(report: &Report, width: usize) -> Vec<String> {
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        "=".repeat(REPORT_TITLE.len()),
        String::new(),
    ];

    for section in &report.sections {
        let title = section.title().to_uppercase();
        let underline = "-".repeat(title.len());
        lines.push(title);
        lines.push(underline);
        for line in &section.lines {
            lines.extend(wrap(line, width));
        }
        lines.push(String::new());
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Wraps `report` to `layout.width` and splits it into pages.
///
/// # Errors
///
/// Returns [`ReportError::Render`] if the layout is too small to hold
/// any content.
pub fn render_pages(report: &Report, layout: PageLayout) -> Result<Vec<Page>, ReportError> {
    let layout = layout.validate()?;
    let lines = document_lines(report, layout.width);
    let chunks: Vec<&[String]> = lines.chunks(layout.body_lines()).collect();
    let total = chunks.len();

    Ok(chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| Page {
            number: i + 1,
            total,
            lines: chunk.to_vec(),
        })
        .collect())
}

/// Renders `report` as plain text, pages separated by form feeds.
///
/// # Errors
///
/// Returns [`ReportError::Render`] if the layout is too small to hold
/// any content.
pub fn render_text(report: &Report, layout: PageLayout) -> Result<String, ReportError> {
    Ok(join_pages(&render_pages(report, layout)?))
}

/// Concatenates rendered pages, each followed by its footer.
#[must_use]
pub fn join_pages(pages: &[Page]) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push('\u{c}');
        }
        page.write_into(&mut out);
    }
    out
}
