use std::ops::Range;

use crate::domain::{FIELD_COUNT, Field, SessionRecord, StationSet};

const SITE_ROOT: &str = "https://ivscc.gsfc.nasa.gov";

/// Walk the first schedule table in `html` into records. Tag matching is
/// targeted at the IVSCC table structure rather than a general HTML parse:
/// `<tr>` blocks inside the first `<table>`, skipping header rows, keeping
/// rows with at least the full column count. `intensive` tags every record
/// from the intensive page.
pub fn extract_records(html: &str, intensive: bool) -> Vec<SessionRecord> {
    // Byte-length-preserving lowercase copy for case-insensitive scanning;
    // slices of the original keep attribute values and text intact.
    let lower = html.to_ascii_lowercase();
    let mut records = Vec::new();

    let Some(table_open) = lower.find("<table") else {
        return records;
    };
    let Some(body_start) = find_from(&lower, table_open, ">") else {
        return records;
    };
    let Some(table_end) = find_from(&lower, body_start, "</table>") else {
        return records;
    };
    let table = body_start + 1..table_end;

    for row in element_blocks(&lower, table, "<tr", "</tr>") {
        if lower[row.clone()].contains("<th") {
            continue;
        }
        let cells = element_blocks(&lower, row, "<td", "</td>");
        if cells.len() < FIELD_COUNT {
            continue;
        }

        let stations_cell = cells[Field::Stations.index()].clone();
        let (active, removed) = station_items(html, &lower, stations_cell);
        let stations = StationSet {
            active,
            removed,
            intensive,
        };

        let mut fields: [String; FIELD_COUNT] = Default::default();
        for (index, cell) in cells.iter().take(FIELD_COUNT).enumerate() {
            fields[index] = inner_text(&html[content_range(&lower, cell.clone(), "</td>")]);
        }
        fields[Field::Stations.index()] = stations.display();

        let detail_url = anchor_href(html, &lower, cells[Field::Code.index()].clone()).map(|href| {
            if href.starts_with('/') {
                format!("{SITE_ROOT}{href}")
            } else {
                href
            }
        });

        records.push(SessionRecord {
            fields,
            detail_url,
            stations,
        });
    }
    records
}

/// Ranges of whole `<open ...>...</close>` blocks inside `within`.
fn element_blocks(lower: &str, within: Range<usize>, open: &str, close: &str) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut pos = within.start;
    loop {
        let Some(start) = find_from(lower, pos, open) else {
            break;
        };
        if start >= within.end {
            break;
        }
        let Some(open_end) = find_from(lower, start, ">") else {
            break;
        };
        let Some(close_start) = find_from(lower, open_end, close) else {
            break;
        };
        let end = close_start + close.len();
        if end > within.end {
            break;
        }
        blocks.push(start..end);
        pos = end;
    }
    blocks
}

/// The text between a block's opening tag and its closing tag.
fn content_range(lower: &str, block: Range<usize>, close: &str) -> Range<usize> {
    let content_start = find_from(lower, block.start, ">")
        .map(|index| index + 1)
        .unwrap_or(block.start);
    let content_end = block.end.saturating_sub(close.len()).max(content_start);
    content_start..content_end
}

/// Station codes from the `<li>` items of a stations cell, split into
/// active and removed by the item's `class` attribute.
fn station_items(html: &str, lower: &str, cell: Range<usize>) -> (Vec<String>, Vec<String>) {
    let mut active = Vec::new();
    let mut removed = Vec::new();
    for item in element_blocks(lower, cell, "<li", "</li>") {
        let content = content_range(lower, item.clone(), "</li>");
        let text = inner_text(&html[content.clone()]);
        let code: String = text
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();
        if code.is_empty() {
            continue;
        }

        let open_tag = &lower[item.start..content.start];
        let is_removed =
            attr_value(open_tag, "class").is_some_and(|classes| classes.contains("removed"));
        if is_removed {
            removed.push(code);
        } else {
            active.push(code);
        }
    }
    (active, removed)
}

/// `href` of the first anchor inside the cell, verbatim from the source.
fn anchor_href(html: &str, lower: &str, cell: Range<usize>) -> Option<String> {
    let anchor = find_from(lower, cell.start, "<a").filter(|&index| index < cell.end)?;
    let open_end = find_from(lower, anchor, ">").filter(|&index| index < cell.end)?;
    let marker = lower[anchor..open_end].find("href=\"")?;
    let value_start = anchor + marker + "href=\"".len();
    let value_end = find_from(html, value_start, "\"")?;
    Some(html[value_start..value_end].to_string())
}

fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("{name}=\"");
    let start = tag.find(&marker)? + marker.len();
    let end = tag[start..].find('"')? + start;
    Some(&tag[start..end])
}

/// Tag-stripped, entity-decoded, whitespace-collapsed text of a fragment.
fn inner_text(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn find_from(text: &str, from: usize, needle: &str) -> Option<usize> {
    text.get(from..)?.find(needle).map(|index| from + index)
}
