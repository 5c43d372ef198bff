use std::io;
use std::path;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Frontend;
use crate::domain::models::InstructionStoreBox;
use crate::domain::models::Loading;
use crate::domain::models::Notice;
use crate::domain::models::RunSettings;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Renderer;
use crate::domain::services::Screenshots;
use crate::infrastructure::stores::FileInstructionStore;
use crate::infrastructure::stores::MemoryInstructionStore;

const STEPS_HINT: &str =
    "Enter run step · a execute all · n next step · e edit · c clear · r reset · 1-9 download · q quit";
const PROMPT_HINT: &str = "Enter run · CTRL+L clear · ALT+1-9 download · CTRL+C quit";

fn bordered(title: String) -> Block<'static> {
    return Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(title)
        .padding(Padding::new(1, 1, 0, 0));
}

fn render<B: Backend>(
    frame: &mut Frame<B>,
    app_state: &mut AppState,
    editor: &Option<tui_textarea::TextArea<'_>>,
    prompt: &tui_textarea::TextArea<'_>,
    loading: &Loading,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let title = format!(
        "clickstep · {} · {}",
        app_state.settings.provider, app_state.settings.model
    );
    let mut banner = PROMPT_HINT.to_string();
    if app_state.frontend == Frontend::Steps {
        banner = Renderer::step_banner(&app_state.session, &app_state.instructions);
        if app_state.session.stepper.is_executing_all() {
            banner += " · executing all steps";
        }
    }
    if app_state.attachment.is_some() {
        banner += " · screenshot attached";
    }
    frame.render_widget(Paragraph::new(banner).block(bordered(title)), layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(layout[1]);

    if let Some(textarea) = editor {
        frame.render_widget(textarea.widget(), body[0]);
    } else {
        // Borders and padding.
        let inner_width = body[0].width.saturating_sub(4);
        let inner_height = body[0].height.saturating_sub(2);
        if inner_width != app_state.last_known_width || inner_height != app_state.last_known_height
        {
            app_state.set_rect(inner_width, inner_height);
        }

        let lines = app_state
            .history_lines()
            .into_iter()
            .map(Line::from)
            .collect::<Vec<Line>>();
        frame.render_widget(
            Paragraph::new(lines)
                .block(bordered("Conversation".to_string()))
                .scroll((app_state.scroll.position, 0)),
            body[0],
        );
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            body[0].inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut app_state.scroll.scrollbar_state,
        );
    }

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[1]);
    frame.render_widget(
        Paragraph::new(Renderer::screenshot_lines(&app_state.session).join("\n"))
            .block(bordered("Screenshots".to_string()))
            .wrap(Wrap { trim: false }),
        side[0],
    );
    frame.render_widget(
        Paragraph::new(Renderer::notice_lines(&app_state.session).join("\n"))
            .block(bordered("Notices".to_string()))
            .wrap(Wrap { trim: false }),
        side[1],
    );

    match app_state.frontend {
        Frontend::Prompt => {
            if app_state.session.is_running {
                loading.render(frame, layout[2], "CTRL+X to stop");
            } else {
                frame.render_widget(prompt.widget(), layout[2]);
            }
        }
        Frontend::Steps => {
            if app_state.session.is_running {
                loading.render(frame, layout[2], "s to stop");
            } else {
                frame.render_widget(
                    Paragraph::new(STEPS_HINT)
                        .block(bordered("Controls".to_string()))
                        .alignment(Alignment::Center),
                    layout[2],
                );
            }
        }
    }
}

fn digit(c: char) -> Option<usize> {
    if ('1'..='9').contains(&c) {
        return c.to_digit(10).map(|e| return e as usize - 1);
    }

    return None;
}

async fn handle_editor_input(
    app_state: &mut AppState,
    editor: &mut Option<tui_textarea::TextArea<'_>>,
    input: Input,
) {
    let Some(textarea) = editor.as_mut() else {
        return;
    };

    match input {
        Input {
            key: Key::Char('s'),
            ctrl: true,
            ..
        } => {
            let text = textarea.lines().join("\n");
            if let Err(err) = app_state.save_instructions(&text).await {
                tracing::error!(error = ?err, "Failed to save instructions");
                app_state
                    .session
                    .notices
                    .push(Notice::error(&err.to_string()));
            }
            *editor = None;
        }
        Input { key: Key::Esc, .. } => {
            *editor = None;
        }
        input => {
            textarea.input(input);
        }
    }
}

/// Returns false when the UI should quit.
async fn handle_steps_input(
    app_state: &mut AppState,
    editor: &mut Option<tui_textarea::TextArea<'_>>,
    input: Input,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<bool> {
    if editor.is_some() {
        handle_editor_input(app_state, editor, input).await;
        return Ok(true);
    }

    match input {
        Input {
            key: Key::Char('q'),
            ..
        } => {
            return Ok(false);
        }
        Input {
            key: Key::Enter, ..
        } => {
            app_state.run_current_step(tx)?;
        }
        Input {
            key: Key::Char('a'),
            ..
        } => {
            app_state.execute_all_steps(tx)?;
        }
        Input {
            key: Key::Char('n'),
            ..
        } => {
            app_state.next_step();
        }
        Input {
            key: Key::Char('s'),
            ..
        }
        | Input { key: Key::Esc, .. } => {
            app_state.stop(tx)?;
        }
        Input {
            key: Key::Char('c'),
            ..
        } => {
            app_state.clear_conversation(tx)?;
        }
        Input {
            key: Key::Char('r'),
            ..
        } => {
            app_state.reset_all();
        }
        Input {
            key: Key::Char('e'),
            ..
        } => {
            if !app_state.session.is_running {
                *editor = Some(TextArea::instructions(&app_state.instructions_text()));
            }
        }
        Input { key: Key::Up, .. } => {
            app_state.scroll.up();
        }
        Input { key: Key::Down, .. } => {
            app_state.scroll.down();
        }
        Input {
            key: Key::Char(c), ..
        } => {
            if let Some(idx) = digit(c) {
                app_state.download_screenshot(idx).await;
            }
        }
        _ => {}
    }

    return Ok(true);
}

async fn handle_prompt_input(
    app_state: &mut AppState,
    prompt: &mut tui_textarea::TextArea<'_>,
    input: Input,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<()> {
    match input {
        Input {
            key: Key::Enter, ..
        } => {
            app_state.prompt = prompt.lines().join(" ");
            app_state.run_prompt(tx)?;
        }
        Input {
            key: Key::Char('x'),
            ctrl: true,
            ..
        } => {
            app_state.stop(tx)?;
        }
        Input {
            key: Key::Char('l'),
            ctrl: true,
            ..
        } => {
            app_state.clear_conversation(tx)?;
        }
        Input {
            key: Key::Char(c),
            alt: true,
            ..
        } if digit(c).is_some() => {
            if let Some(idx) = digit(c) {
                app_state.download_screenshot(idx).await;
            }
        }
        Input { key: Key::Up, .. } => {
            app_state.scroll.up();
        }
        Input { key: Key::Down, .. } => {
            app_state.scroll.down();
        }
        input => {
            prompt.input(input);
        }
    }

    return Ok(());
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut loading = Loading::default();
    let mut editor: Option<tui_textarea::TextArea> = None;
    let mut prompt = TextArea::prompt(&app_state.prompt);

    loop {
        terminal.draw(|frame| {
            render(frame, app_state, &editor, &prompt, &loading);
        })?;

        match events.next().await? {
            Event::AgentOutput(run_id, block) => {
                app_state.handle_agent_output(run_id, &block);
            }
            Event::AgentToolOutput(run_id, result, tool_use_id) => {
                app_state.handle_agent_tool_output(run_id, &result, &tool_use_id);
            }
            Event::AgentApiContent(run_id, texts) => {
                app_state.handle_agent_api_content(run_id, texts);
            }
            Event::RunFinished(run_id, outcome) => {
                app_state.handle_run_finished(run_id, outcome, &tx)?;
            }
            Event::RunRejected(run_id) => {
                app_state.handle_run_rejected(run_id);
            }
            Event::KeyboardCTRLC() => {
                app_state.stop(&tx)?;
                break;
            }
            Event::KeyboardPaste(text) => {
                if let Some(textarea) = editor.as_mut() {
                    textarea.insert_str(text);
                } else if app_state.frontend == Frontend::Prompt {
                    prompt.insert_str(text.replace('\n', " "));
                }
            }
            Event::KeyboardInput(input) => match app_state.frontend {
                Frontend::Steps => {
                    if !handle_steps_input(app_state, &mut editor, input, &tx).await? {
                        app_state.stop(&tx)?;
                        break;
                    }
                }
                Frontend::Prompt => {
                    handle_prompt_input(app_state, &mut prompt, input, &tx).await?;
                }
            },
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UIResize() => {}
            Event::UITick() => {
                loading.tick();
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    frontend: Frontend,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let store: InstructionStoreBox = match frontend {
        Frontend::Steps => Box::new(FileInstructionStore::new(path::PathBuf::from(
            Config::get(ConfigKey::InstructionsFile),
        ))),
        Frontend::Prompt => Box::<MemoryInstructionStore>::default(),
    };

    let screenshot = Config::get(ConfigKey::Screenshot);
    let mut attachment: Option<String> = None;
    if !screenshot.is_empty() {
        attachment = Some(Screenshots::encode_upload(&path::PathBuf::from(screenshot)).await?);
    }

    let mut app_state = AppState::new(
        frontend,
        RunSettings::from_config()?,
        store,
        attachment,
        path::PathBuf::from(Config::get(ConfigKey::DownloadDir)),
    )
    .await?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
