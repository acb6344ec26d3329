/// Single-line editor backing the filter prompt.
#[derive(Clone, Debug, Default)]
pub struct PromptEditor {
    text: String,
    cursor: usize, // char index, 0..=len
}

impl PromptEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing an existing filter with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn insert(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let byte_index = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_index, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte_index = char_to_byte_index(&self.text, self.cursor);
        self.text.remove(byte_index);
    }

    pub fn delete_forward(&mut self) {
        if self.cursor >= self.text.chars().count() {
            return;
        }
        let byte_index = char_to_byte_index(&self.text, self.cursor);
        self.text.remove(byte_index);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// The slice of the text that fits in `width` columns with the cursor
    /// kept visible, plus the cursor's column inside that slice. The window
    /// scrolls horizontally once the cursor would leave it.
    pub fn window(&self, width: usize) -> (&str, usize) {
        if width == 0 {
            return ("", 0);
        }
        let len = self.text.chars().count();
        let first = if self.cursor >= width {
            self.cursor + 1 - width
        } else {
            0
        };
        let start = char_to_byte_index(&self.text, first);
        let end = char_to_byte_index(&self.text, (first + width).min(len));
        (&self.text[start..end], self.cursor - first)
    }
}

fn char_to_byte_index(text: &str, char_index: usize) -> usize {
    match text.char_indices().nth(char_index) {
        Some((index, _)) => index,
        None => text.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_handle_multibyte_text() {
        let mut prompt = PromptEditor::new();
        for ch in "stations: Nÿ".chars() {
            prompt.insert(ch);
        }
        assert_eq!(prompt.text(), "stations: Nÿ");
        prompt.backspace();
        assert_eq!(prompt.text(), "stations: N");
    }

    #[test]
    fn editing_in_the_middle() {
        let mut prompt = PromptEditor::with_text("cde: R1");
        prompt.move_home();
        prompt.insert('o');
        assert_eq!(prompt.text(), "ocde: R1");
        prompt.move_right();
        prompt.delete_forward();
        assert_eq!(prompt.text(), "oce: R1");
        prompt.move_end();
        prompt.backspace();
        assert_eq!(prompt.text(), "oce: R");
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut prompt = PromptEditor::new();
        prompt.insert('\n');
        prompt.insert('\t');
        prompt.insert('a');
        assert_eq!(prompt.text(), "a");
    }

    #[test]
    fn window_shows_everything_when_it_fits() {
        let prompt = PromptEditor::with_text("code: R1");
        let (visible, cursor) = prompt.window(20);
        assert_eq!(visible, "code: R1");
        assert_eq!(cursor, 8);
    }

    #[test]
    fn window_scrolls_to_keep_the_cursor_visible() {
        let prompt = PromptEditor::with_text("stations: Ns&Nn|Ht");
        let (visible, cursor) = prompt.window(8);
        assert_eq!(visible, "s&Nn|Ht");
        assert_eq!(cursor, 7);

        let mut back_home = prompt.clone();
        back_home.move_home();
        let (visible, cursor) = back_home.window(8);
        assert_eq!(visible, "stations");
        assert_eq!(cursor, 0);
    }
}
