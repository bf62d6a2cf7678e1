//! Terminal rendering of query result tables.
//!
//! Turns one page of a result into aligned plain text, with a footer
//! giving the full record count, the page position, and a note when only
//! part of the set is shown.

use loupe_core::{QueryResult, Row, TableConfig};
use loupe_table::{columns, format_cell, group_thousands, paginate, CellRender};

/// Render one page of a result as an aligned text table with footer.
pub fn render_table(result: &QueryResult, page: usize, table: &TableConfig) -> String {
    if result.rows.is_empty() {
        return "(레코드 없음)".to_string();
    }

    let headers = columns(&result.rows);
    let sliced = paginate(&result.rows, table.rows_per_page, page, table.max_rows);

    let mut out = String::new();
    if sliced.rows.is_empty() {
        out.push_str(&format!(
            "페이지 범위를 벗어났습니다. (페이지 {} / {})\n",
            page, sliced.total_pages
        ));
    } else {
        out.push_str(&grid(&headers, sliced.rows));
    }

    out.push_str(&format!("총 {}개 레코드", group_thousands(result.row_count)));
    let shown = result.rows.len().min(table.max_rows);
    if sliced.capped || result.truncated() {
        out.push_str(&format!(" (상위 {}개만 표시)", shown));
    }
    if sliced.total_pages > 1 {
        out.push_str(&format!(" — 페이지 {} / {}", page, sliced.total_pages));
    }
    out.push('\n');
    out
}

/// Aligned header + separator + rows.
fn grid(headers: &[String], rows: &[Row]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|name| {
                    row.get(name)
                        .map(|value| render_cell(&format_cell(value)))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain([header.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&line(headers, &widths));
    out.push_str(&separator(&widths));
    for row in &cells {
        out.push_str(&line(row, &widths));
    }
    out
}

fn line<S: AsRef<str>>(fields: &[S], widths: &[usize]) -> String {
    let mut out = String::new();
    for (field, width) in fields.iter().zip(widths) {
        let field = field.as_ref();
        out.push_str(field);
        for _ in field.chars().count()..*width {
            out.push(' ');
        }
        out.push_str("  ");
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

fn separator(widths: &[usize]) -> String {
    let mut out = String::new();
    for width in widths {
        out.push_str(&"-".repeat(*width));
        out.push_str("  ");
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

/// Flatten a classified cell to terminal text.
pub fn render_cell(render: &CellRender) -> String {
    match render {
        CellRender::Null => "NULL".to_string(),
        CellRender::Badge(true) => "TRUE".to_string(),
        CellRender::Badge(false) => "FALSE".to_string(),
        CellRender::Number(text) => text.clone(),
        CellRender::Date(text) => text.clone(),
        CellRender::Link { display, .. } => display.clone(),
        CellRender::Truncated { display, .. } => display.clone(),
        CellRender::Text(text) => text.clone(),
    }
}

// =============================================================================
// Tests
// =============================================================================
