use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub struct TextArea {}

impl<'a> TextArea {
    /// Multi line editor for the instructions list.
    pub fn instructions(text: &str) -> tui_textarea::TextArea<'a> {
        let lines = text
            .lines()
            .map(|line| return line.to_string())
            .collect::<Vec<String>>();

        let mut textarea = tui_textarea::TextArea::new(lines);
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title("Instructions (one per line, start with '-'). CTRL+S to save, ESC to cancel")
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }

    /// Single line input for the prompt front-end.
    pub fn prompt(text: &str) -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::new(vec![text.to_string()]);
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title("Enter your instruction")
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }
}
