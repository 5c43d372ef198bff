use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Shown in place of the controls while a run is in flight.
#[derive(Default)]
pub struct Loading {
    ticks: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, stop_hint: &str) {
        let spinner = SPINNER[self.ticks % SPINNER.len()];
        frame.render_widget(
            Paragraph::new(format!("{spinner} Running... {stop_hint}"))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}
