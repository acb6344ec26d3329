mod prompt;

pub use prompt::PromptEditor;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;
use time::PrimitiveDateTime;

use crate::domain::{ColumnLayout, FilterQuery, SessionRecord, index_on_or_after};

/// Lines not available to the row list: header, dash rule, status bar.
pub const CHROME_ROWS: u16 = 3;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Quit,
    OpenUrl(String),
}

/// All browser state, owned by the control loop and replaced wholesale by
/// `update`. `visible` indexes into `records`; the viewport invariant
/// `offset <= selected <= offset + view_height - 1` (and both zero when no
/// rows are visible) holds after every transition.
#[derive(Clone, Debug)]
pub struct AppModel {
    pub records: Vec<SessionRecord>,
    pub visible: Vec<usize>,
    pub filter_text: String,
    pub highlight_tokens: Vec<String>,
    pub selected: usize,
    pub offset: usize,
    pub show_removed: bool,
    pub layout: ColumnLayout,
    pub prompt: Option<PromptEditor>,
    pub help_open: bool,
    pub notice: Option<String>,
    pub terminal_size: (u16, u16),
}

impl AppModel {
    /// `records` must already be chronologically sorted; the viewport is
    /// anchored on `now`.
    pub fn new(records: Vec<SessionRecord>, now: PrimitiveDateTime) -> Self {
        let visible: Vec<usize> = (0..records.len()).collect();
        let mut model = Self {
            records,
            visible,
            filter_text: String::new(),
            highlight_tokens: Vec::new(),
            selected: 0,
            offset: 0,
            show_removed: true,
            layout: ColumnLayout::default(),
            prompt: None,
            help_open: false,
            notice: None,
            terminal_size: (0, 0),
        };
        model.recompute_layout();
        model.jump_to_now(now);
        model
    }

    pub fn view_height(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(CHROME_ROWS)).max(1)
    }

    pub fn visible_record(&self, position: usize) -> Option<&SessionRecord> {
        self.visible
            .get(position)
            .and_then(|&index| self.records.get(index))
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &SessionRecord> {
        self.visible.iter().map(|&index| &self.records[index])
    }

    /// Re-filter against `query_text`, recompute highlights and layout, and
    /// anchor the viewport on `now`. An empty query shows every record.
    pub fn apply_filter(&mut self, query_text: &str, now: PrimitiveDateTime) {
        let query = FilterQuery::parse(query_text);
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| query.matches(record))
            .map(|(index, _)| index)
            .collect();
        self.highlight_tokens = query.highlight_tokens();
        self.filter_text = query_text.trim().to_string();
        self.recompute_layout();
        self.jump_to_now(now);
    }

    pub fn jump_to_now(&mut self, now: PrimitiveDateTime) {
        if self.visible.is_empty() {
            self.selected = 0;
            self.offset = 0;
            return;
        }
        let position = index_on_or_after(self.visible_records(), now);
        self.selected = position;
        self.offset = position;
        self.reconcile();
    }

    /// Rendering toggle only: which rows are visible does not change, and
    /// neither does the selection.
    pub fn toggle_show_removed(&mut self) {
        self.show_removed = !self.show_removed;
        self.recompute_layout();
    }

    fn recompute_layout(&mut self) {
        self.layout = ColumnLayout::compute(self.visible_records(), self.show_removed);
    }

    fn move_selected_to(&mut self, position: usize) {
        if self.visible.is_empty() {
            self.selected = 0;
            self.offset = 0;
            return;
        }
        self.selected = position.min(self.visible.len() - 1);
        self.reconcile();
    }

    /// Re-clamp the scroll offset around the selection so the viewport
    /// invariant holds for the current view height.
    fn reconcile(&mut self) {
        if self.visible.is_empty() {
            self.selected = 0;
            self.offset = 0;
            return;
        }
        let view_height = self.view_height();
        self.selected = self.selected.min(self.visible.len() - 1);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + view_height {
            self.offset = self.selected + 1 - view_height;
        }
    }
}

/// One step of the state machine: consume an input event, produce the next
/// model plus a side effect for the control loop to run.
pub fn update(model: AppModel, event: AppEvent, now: PrimitiveDateTime) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Key(key) => update_on_key(model, key, now),
        AppEvent::Resize(width, height) => {
            let mut model = model;
            model.terminal_size = (width, height);
            model.recompute_layout();
            model.reconcile();
            (model, AppCommand::None)
        }
    }
}

fn update_on_key(
    mut model: AppModel,
    key: KeyEvent,
    now: PrimitiveDateTime,
) -> (AppModel, AppCommand) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return (model, AppCommand::Quit);
    }

    if model.prompt.is_some() {
        return update_prompt_key(model, key, now);
    }

    if model.help_open {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1)
        ) {
            model.help_open = false;
        }
        return (model, AppCommand::None);
    }

    model.notice = None;
    match key.code {
        KeyCode::Up => {
            let next = model.selected.saturating_sub(1);
            model.move_selected_to(next);
        }
        KeyCode::Down => {
            let next = model.selected.saturating_add(1);
            model.move_selected_to(next);
        }
        KeyCode::PageUp => {
            let next = model.selected.saturating_sub(model.view_height());
            model.move_selected_to(next);
        }
        KeyCode::PageDown => {
            let next = model.selected.saturating_add(model.view_height());
            model.move_selected_to(next);
        }
        KeyCode::Home => model.move_selected_to(0),
        KeyCode::End => {
            let last = model.visible.len().saturating_sub(1);
            model.move_selected_to(last);
        }
        KeyCode::Char('t') | KeyCode::Char('T') => model.jump_to_now(now),
        KeyCode::Enter => {
            let url = model
                .visible_record(model.selected)
                .and_then(|record| record.detail_url.clone());
            match url {
                Some(url) => return (model, AppCommand::OpenUrl(url)),
                None => {
                    model.notice = Some("Selected session has no detail page.".to_string());
                }
            }
        }
        KeyCode::Char('/') => {
            model.prompt = Some(PromptEditor::with_text(&model.filter_text));
        }
        KeyCode::Char('F') => model.apply_filter("", now),
        KeyCode::Char('r') | KeyCode::Char('R') => model.toggle_show_removed(),
        KeyCode::Char('?') | KeyCode::F(1) => model.help_open = true,
        KeyCode::Char('q') | KeyCode::Esc => return (model, AppCommand::Quit),
        _ => {}
    }
    (model, AppCommand::None)
}

fn update_prompt_key(
    mut model: AppModel,
    key: KeyEvent,
    now: PrimitiveDateTime,
) -> (AppModel, AppCommand) {
    let Some(prompt) = model.prompt.as_mut() else {
        return (model, AppCommand::None);
    };

    match key.code {
        KeyCode::Enter => {
            let query_text = prompt.text().to_string();
            model.prompt = None;
            model.apply_filter(&query_text, now);
        }
        KeyCode::Esc => model.prompt = None,
        KeyCode::Backspace => prompt.backspace(),
        KeyCode::Delete => prompt.delete_forward(),
        KeyCode::Left => prompt.move_left(),
        KeyCode::Right => prompt.move_right(),
        KeyCode::Home => prompt.move_home(),
        KeyCode::End => prompt.move_end(),
        KeyCode::Char(ch) => prompt.insert(ch),
        _ => {}
    }
    (model, AppCommand::None)
}
