//! Plain-text console table.

use assetq_core::row::headers;
use assetq_core::{Column, ResultRow};

/// Cells wider than this are cut and marked with `...`.
const MAX_CELL_WIDTH: usize = 48;

/// Terminal columns taken by a character. East Asian scripts take two.
fn char_width(c: char) -> usize {
    if ('\u{2E80}'..='\u{FFEF}').contains(&c) {
        2
    } else {
        1
    }
}

fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

fn clip(text: &str) -> String {
    if display_width(text) <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        if width + char_width(c) > MAX_CELL_WIDTH - 3 {
            break;
        }
        width += char_width(c);
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Render rows as a bordered table over a column layout.
#[must_use]
pub fn render_table(columns: &[Column], rows: &[ResultRow]) -> String {
    let header: Vec<String> = headers(columns).into_iter().map(str::to_string).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.project(columns).iter().map(|cell| clip(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| display_width(h)).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(display_width(cell));
        }
    }

    let border = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let border = format!("+{border}+\n");

    let line = |cells: &[String]| {
        let padded = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - display_width(cell);
                format!(" {cell}{} ", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("|");
        format!("|{padded}|\n")
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&line(&header));
    out.push_str(&border);
    for cells in &body {
        out.push_str(&line(cells));
    }
    out.push_str(&border);
    out
}
