use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

/// Merges terminal input, runner events, and a periodic tick into a single
/// stream for the UI loop.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(Event::KeyboardPaste(text));
            }
            CrosstermEvent::Resize(_, _) => {
                return Some(Event::UIResize());
            }
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => {
                    return Some(Event::UIScrollUp());
                }
                MouseEventKind::ScrollDown => {
                    return Some(Event::UIScrollDown());
                }
                _ => {
                    return None;
                }
            },
            CrosstermEvent::Key(keyevent) => match keyevent.into() {
                Input {
                    key: Key::PageDown, ..
                } => {
                    return Some(Event::UIScrollPageDown());
                }
                Input {
                    key: Key::PageUp, ..
                } => {
                    return Some(Event::UIScrollPageUp());
                }
                Input {
                    key: Key::Char('c'),
                    ctrl: true,
                    ..
                } => {
                    return Some(Event::KeyboardCTRLC());
                }
                Input { key: Key::Null, .. } => {
                    return None;
                }
                input => {
                    return Some(Event::KeyboardInput(input));
                }
            },
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
