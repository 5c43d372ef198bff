#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

use ratatui::widgets::ScrollbarState;

/// Scroll position of the history pane, counted in rendered lines from the
/// top.
#[derive(Default)]
pub struct Scroll {
    list_length: u16,
    viewport_length: u16,
    pub position: u16,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    fn max_position(&self) -> u16 {
        return self.list_length.saturating_sub(self.viewport_length);
    }

    fn page(&self) -> u16 {
        return self.viewport_length.saturating_sub(1).max(1);
    }

    fn move_to(&mut self, position: u16) {
        self.position = position.min(self.max_position());
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn up(&mut self) {
        self.move_to(self.position.saturating_sub(1));
    }

    pub fn up_page(&mut self) {
        self.move_to(self.position.saturating_sub(self.page()));
    }

    pub fn down(&mut self) {
        self.move_to(self.position.saturating_add(1));
    }

    pub fn down_page(&mut self) {
        self.move_to(self.position.saturating_add(self.page()));
    }

    pub fn last(&mut self) {
        self.move_to(self.max_position());
    }

    pub fn reset(&mut self) {
        self.move_to(0);
    }

    pub fn is_at_bottom(&self) -> bool {
        return self.position >= self.max_position();
    }

    /// Updates the sizes after the history or the terminal changed, keeping
    /// the position within bounds.
    pub fn set_state(&mut self, list_length: u16, viewport_length: u16) {
        self.list_length = list_length;
        self.viewport_length = viewport_length;
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(list_length)
            .viewport_content_length(viewport_length);
        self.move_to(self.position);
    }
}
