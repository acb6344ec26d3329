mod theme;

use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::*;
use unicode_width::UnicodeWidthStr;

use crate::app::{AppModel, CHROME_ROWS, PromptEditor};
use crate::domain::{
    COLUMN_SEPARATOR, Field, INTENSIVE_MARKER, SessionRecord, header_line, highlight_spans,
    render_cells,
};

pub fn render(frame: &mut Frame, model: &AppModel) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    render_header(frame, area, model);
    render_rows(frame, area, model);
    match &model.prompt {
        Some(prompt) => render_prompt(frame, area, prompt),
        None => render_status_bar(frame, area, model),
    }
    if model.help_open {
        render_help_overlay(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, model: &AppModel) {
    let header = header_line(&model.layout);
    let style = Style::default()
        .fg(theme::HEADER)
        .add_modifier(Modifier::BOLD);
    let rule = "-".repeat(header.width());
    frame.render_widget(Paragraph::new(header).style(style), line_rect(area, 0));
    if area.height > 1 {
        frame.render_widget(Paragraph::new(rule), line_rect(area, 1));
    }
}

fn render_rows(frame: &mut Frame, area: Rect, model: &AppModel) {
    let list_area = Rect {
        x: area.x,
        y: area.y.saturating_add(2),
        width: area.width,
        height: area.height.saturating_sub(CHROME_ROWS),
    };
    if list_area.height == 0 {
        return;
    }

    if model.visible.is_empty() {
        frame.render_widget(Paragraph::new("No sessions found."), list_area);
        return;
    }

    let view_height = usize::from(list_area.height);
    let end = model.offset.saturating_add(view_height).min(model.visible.len());
    let mut lines = Vec::new();
    for position in model.offset..end {
        let Some(record) = model.visible_record(position) else {
            continue;
        };
        lines.push(row_line(model, record, position == model.selected));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), list_area);
}

fn row_line(model: &AppModel, record: &SessionRecord, selected: bool) -> Line<'static> {
    let cells = render_cells(record, &model.layout, model.show_removed);
    let mut base = Style::default();
    if let Some(color) = status_color(record.field(Field::Status)) {
        base = base.fg(color);
    }
    if selected {
        base = base.add_modifier(Modifier::REVERSED);
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    for field in Field::ALL {
        if field.index() > 0 {
            spans.push(Span::styled(COLUMN_SEPARATOR, base));
        }
        let cell = cells[field.index()].clone();
        match field {
            Field::Stations => spans.extend(stations_spans(cell, model, base)),
            Field::Type if record.stations.intensive => spans.extend(type_spans(cell, base)),
            _ => spans.push(Span::styled(cell, base)),
        }
    }
    Line::from(spans)
}

/// The type cell of an intensive session: value, then the marker packed at
/// the right edge in its own color.
fn type_spans(cell: String, base: Style) -> Vec<Span<'static>> {
    let split = cell.len().saturating_sub(INTENSIVE_MARKER.len());
    vec![
        Span::styled(cell[..split].to_string(), base),
        Span::styled(cell[split..].to_string(), base.fg(theme::INTENSIVE)),
    ]
}

/// The stations cell split into styled segments: filter-token highlights
/// win over the removed-stations bracket, which wins over the row style.
fn stations_spans(cell: String, model: &AppModel, base: Style) -> Vec<Span<'static>> {
    let token_ranges = highlight_spans(&cell, &model.highlight_tokens);
    let bracket = if model.show_removed {
        bracket_range(&cell)
    } else {
        None
    };

    let style_for = |class: u8| match class {
        2 => base
            .fg(theme::HIGHLIGHT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        1 => base.fg(theme::REMOVED),
        _ => base,
    };

    let mut spans = Vec::new();
    let mut segment = String::new();
    let mut segment_class = 0u8;
    for (index, ch) in cell.char_indices() {
        let class = if token_ranges
            .iter()
            .any(|span| index >= span.start && index < span.start + span.len)
        {
            2
        } else if bracket
            .as_ref()
            .is_some_and(|range| range.contains(&index))
        {
            1
        } else {
            0
        };
        if class != segment_class && !segment.is_empty() {
            spans.push(Span::styled(
                std::mem::take(&mut segment),
                style_for(segment_class),
            ));
        }
        segment_class = class;
        segment.push(ch);
    }
    if !segment.is_empty() {
        spans.push(Span::styled(segment, style_for(segment_class)));
    }
    spans
}

/// Byte range of the `[removed]` portion of a rendered stations cell.
fn bracket_range(cell: &str) -> Option<std::ops::Range<usize>> {
    let open = cell.find('[')?;
    let close = cell[open..].find(']')? + open;
    Some(open..close + 1)
}

fn status_color(status: &str) -> Option<Color> {
    let status = status.trim().to_lowercase();
    if status.contains("released") {
        return Some(theme::RELEASED);
    }
    let processing = [
        "waiting on media",
        "ready for processing",
        "cleaning up",
        "processing session",
    ];
    if processing.iter().any(|phase| status.contains(phase)) {
        return Some(theme::PROCESSING);
    }
    if status.contains("cancelled") || status.contains("canceled") {
        return Some(theme::CANCELLED);
    }
    if status.is_empty() {
        return Some(theme::NO_STATUS);
    }
    None
}

fn render_status_bar(frame: &mut Frame, area: Rect, model: &AppModel) {
    let mut bar = String::from(
        "↑↓ Move  PgUp/PgDn Page  Home/End Jump  t Now  Enter Open  / Filter  F Clear  r Removed  ? Help  q Quit",
    );
    if !model.filter_text.is_empty() {
        bar.push_str("  filter: ");
        bar.push_str(&model.filter_text);
    }
    if let Some(notice) = &model.notice {
        bar.push_str("  ");
        bar.push_str(notice);
    }
    let shown = (model.selected + 1).min(model.visible.len());
    bar.push_str(&format!("  row {shown}/{}", model.visible.len()));

    let style = Style::default().fg(theme::BAR_FG).bg(theme::BAR_BG);
    frame.render_widget(
        Paragraph::new(bar).style(style),
        line_rect(area, area.height - 1),
    );
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &PromptEditor) {
    let prefix = "/ ";
    let available = usize::from(area.width).saturating_sub(prefix.len() + 1);
    let (visible, cursor) = prompt.window(available);
    let style = Style::default().add_modifier(Modifier::REVERSED);
    frame.render_widget(
        Paragraph::new(format!("{prefix}{visible}")).style(style),
        line_rect(area, area.height - 1),
    );
    frame.set_cursor_position(Position::new(
        area.x + (prefix.len() + cursor) as u16,
        area.y + area.height - 1,
    ));
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from("Navigation"),
        Line::from("  - Up/Down: move selection"),
        Line::from("  - PgUp/PgDn: page up/down"),
        Line::from("  - Home/End: jump to first/last session"),
        Line::from("  - t: jump to the first session on or after now"),
        Line::from("  - Enter: open the selected session's detail page"),
        Line::from(""),
        Line::from("Filtering"),
        Line::from("  - /: edit the filter (Enter applies, Esc cancels)"),
        Line::from("  - F: clear the filter"),
        Line::from("  - r: show/hide removed stations"),
        Line::from("  - Clauses separated by ';' must all match"),
        Line::from("  - field: value matches one column (code, start, db, ops, ...)"),
        Line::from("  - stations: Ns&Nn needs both, stations: Ns|Nn needs either"),
        Line::from("  - stations_removed / stations_all check the other station lists"),
        Line::from("  - Station codes match case-sensitively, everything else ignores case"),
        Line::from(""),
        Line::from("Other"),
        Line::from("  - ?: toggle this help"),
        Line::from("  - q or Esc: quit"),
    ];
    let popup = centered_rect(area, 74, text.len() as u16 + 2);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .title("Help (? to close)"),
    );
    frame.render_widget(paragraph, popup);
}

fn line_rect(area: Rect, row: u16) -> Rect {
    Rect {
        x: area.x,
        y: area.y.saturating_add(row),
        width: area.width,
        height: 1,
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
