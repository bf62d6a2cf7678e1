//! Cell classification for display.
//!
//! `format_cell` maps a scalar cell onto a render classification: a NULL
//! marker, a boolean badge, a formatted number, a localized date, a
//! truncated link, truncated long text, or plain text. The classification
//! is pure; painting it is the presentation layer's job.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use loupe_core::CellValue;

/// Display truncation lengths, in characters.
const URL_DISPLAY_CHARS: usize = 30;
const TEXT_DISPLAY_CHARS: usize = 50;

/// How a single cell should be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum CellRender {
    /// Fixed NULL marker.
    Null,
    /// TRUE/FALSE badge.
    Badge(bool),
    /// Formatted numeric text.
    Number(String),
    /// Localized date text.
    Date(String),
    /// Link with a possibly truncated display string; `href` keeps the
    /// full value for the underlying target.
    Link { display: String, href: String },
    /// Long text truncated for display; `full` is retained for export
    /// and tooltips.
    Truncated { display: String, full: String },
    /// Literal text.
    Text(String),
}

/// Classify a cell for rendering.
pub fn format_cell(value: &CellValue) -> CellRender {
    match value {
        CellValue::Null => CellRender::Null,
        CellValue::Bool(b) => CellRender::Badge(*b),
        CellValue::Int(n) => CellRender::Number(format_int(*n)),
        CellValue::Float(f) => CellRender::Number(format_float(*f)),
        CellValue::Text(s) => format_text(s),
    }
}

fn format_text(s: &str) -> CellRender {
    if let Some(m) = date_pattern().find(s) {
        if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d") {
            return CellRender::Date(format_date_korean(date));
        }
        return CellRender::Text(s.to_string());
    }

    if s.starts_with("http://") || s.starts_with("https://") {
        return CellRender::Link {
            display: ellipsize(s, URL_DISPLAY_CHARS),
            href: s.to_string(),
        };
    }

    if s.chars().count() > TEXT_DISPLAY_CHARS {
        return CellRender::Truncated {
            display: ellipsize(s, TEXT_DISPLAY_CHARS),
            full: s.to_string(),
        };
    }

    CellRender::Text(s.to_string())
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ASCII classes only: Unicode `\d` would admit full-width digits and
    // break the fixed-width assumption on the matched prefix.
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("invalid date regex")
    })
}

/// ko-KR locale date form: `2020. 11. 21.`
fn format_date_korean(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}. {}. {}.", date.year(), date.month(), date.day())
}

fn format_int(n: i64) -> String {
    if n.unsigned_abs() >= 1000 {
        group_signed(n)
    } else {
        n.to_string()
    }
}

fn format_float(f: f64) -> String {
    if f.abs() >= 1000.0 {
        let rounded = (f * 10_000.0).round() / 10_000.0;
        let whole = rounded.trunc() as i64;
        let fraction = strip_fraction(rounded.abs());
        if fraction.is_empty() {
            group_signed(whole)
        } else {
            format!("{}.{}", group_signed(whole), fraction)
        }
    } else if f.fract() != 0.0 {
        let mut text = format!("{:.4}", f);
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    } else {
        format!("{}", f.trunc() as i64)
    }
}

/// Fractional digits of `f` rounded to four places, trailing zeros
/// stripped; empty for whole numbers.
fn strip_fraction(f: f64) -> String {
    let text = format!("{:.4}", f);
    let digits = text.split('.').nth(1).unwrap_or("");
    digits.trim_end_matches('0').to_string()
}

/// Group a non-negative integer's digits with thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn group_signed(n: i64) -> String {
    if n < 0 {
        format!("-{}", group_thousands(n.unsigned_abs()))
    } else {
        group_thousands(n as u64)
    }
}

/// Truncate to `max` characters with an ellipsis marker when longer.
fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
