use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::domain::{
    COLUMN_SEPARATOR, ColumnLayout, FIELD_COUNT, Field, INTENSIVE_MARKER, SessionRecord,
};

/// A byte range to emphasize inside a rendered stations cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HighlightSpan {
    pub start: usize,
    pub len: usize,
}

/// Render every field to a fixed-width cell. Each cell is exactly the
/// layout width for its column: overlong values are truncated, everything
/// else is left-justified. Intensive sessions get the marker right-packed
/// into the type cell; the stations cell honors the removed toggle.
pub fn render_cells(
    record: &SessionRecord,
    layout: &ColumnLayout,
    show_removed: bool,
) -> [String; FIELD_COUNT] {
    let mut cells: [String; FIELD_COUNT] = Default::default();
    for field in Field::ALL {
        let width = layout.width(field);
        let cell = match field {
            Field::Type if record.stations.intensive => {
                pack_marker(record.field(field), INTENSIVE_MARKER, width)
            }
            Field::Stations => pad(&record.stations_text(show_removed), width),
            _ => pad(record.field(field), width),
        };
        cells[field.index()] = cell;
    }
    cells
}

/// The column labels padded to the layout widths and joined, for the
/// header row and its dash rule.
pub fn header_line(layout: &ColumnLayout) -> String {
    let labels: Vec<String> = Field::ALL
        .iter()
        .map(|field| pad(field.label(), layout.width(*field)))
        .collect();
    labels.join(COLUMN_SEPARATOR)
}

/// Non-overlapping occurrences of the highlight tokens inside a rendered
/// stations cell, scanning each token left to right. Tokens are expected
/// longest-first (as produced by `FilterQuery::highlight_tokens`) so a
/// shorter token cannot claim bytes inside a longer match.
pub fn highlight_spans(cell: &str, tokens: &[String]) -> Vec<HighlightSpan> {
    let mut spans: Vec<HighlightSpan> = Vec::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let mut from = 0;
        while let Some(found) = cell[from..].find(token.as_str()) {
            let start = from + found;
            let end = start + token.len();
            let claimed = spans
                .iter()
                .any(|span| start < span.start + span.len && span.start < end);
            if !claimed {
                spans.push(HighlightSpan {
                    start,
                    len: token.len(),
                });
            }
            from = end;
        }
    }
    spans.sort_by_key(|span| span.start);
    spans
}

/// Left-justify to exactly `width` display columns, truncating if needed.
fn pad(value: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in value.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn pack_marker(value: &str, marker: &str, width: usize) -> String {
    let base = width.saturating_sub(marker.width());
    let mut out = pad(value, base);
    out.push_str(marker);
    out
}
