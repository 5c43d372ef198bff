use test_utils::png_fixture_base64;

use super::SessionState;
use crate::domain::models::ContentBlock;
use crate::domain::models::Message;
use crate::domain::models::NoticeLevel;
use crate::domain::models::Role;
use crate::domain::models::RunOutcome;
use crate::domain::models::ToolResult;

fn text(text: &str) -> ContentBlock {
    return ContentBlock::Text {
        text: text.to_string(),
    };
}

#[test]
fn it_starts_fresh() {
    let session = SessionState::new(3);

    assert!(!session.is_running);
    assert_eq!(session.current_step(), 0);
    assert!(!session.step_completed());
    assert!(session.messages.is_empty());
    assert!(session.screenshots.is_empty());
    assert!(session.notices.is_empty());
}

#[test]
fn it_appends_one_entry_per_text_output_in_order() {
    let mut session = SessionState::new(1);
    session.begin_run();

    session.apply_output(&text("First"));
    session.apply_output(&ContentBlock::ToolUse {
        id: "toolu_1".to_string(),
        name: "computer".to_string(),
        input: serde_json::json!({ "action": "screenshot" }),
    });
    session.apply_output(&text("Second"));
    session.finish_run(&RunOutcome::Completed(vec![]));

    assert_eq!(
        session.messages,
        vec![
            Message::new(Role::Assistant, "First"),
            Message::new(Role::Assistant, "Second"),
        ]
    );
    assert!(!session.is_running);
    assert!(session.notices.is_empty());
}

#[test]
fn it_appends_tool_output_and_errors() {
    let mut session = SessionState::new(1);

    session.apply_tool_output(
        &ToolResult {
            output: Some("clicked".to_string()),
            error: Some("window moved".to_string()),
            base64_image: None,
        },
        "toolu_1",
    );

    assert_eq!(
        session.messages,
        vec![
            Message::new(Role::Tool, "Tool Output: clicked"),
            Message::new(Role::Error, "Error: window moved"),
        ]
    );
    assert!(session.screenshots.is_empty());
}

#[test]
fn it_names_screenshots_after_the_tool_use_id() {
    let mut session = SessionState::new(1);
    let result = ToolResult {
        base64_image: Some(png_fixture_base64().to_string()),
        ..ToolResult::default()
    };
    let other = ToolResult {
        base64_image: Some("aGVsbG8=".to_string()),
        ..ToolResult::default()
    };

    session.apply_tool_output(&result, "toolu_1");
    session.apply_tool_output(&other, "toolu_1");

    assert!(session.messages.is_empty());
    assert_eq!(session.screenshots.len(), 2);
    assert_eq!(session.screenshots[0].filename, "screenshot_toolu_1.png");
    assert_eq!(session.screenshots[1].filename, "screenshot_toolu_1.png");
    assert_eq!(session.screenshots[1].base64_image, "aGVsbG8=");
}

#[test]
fn it_appends_api_content_as_system() {
    let mut session = SessionState::new(1);
    session.apply_api_content(vec!["one".to_string(), "two".to_string()]);

    assert_eq!(
        session.messages,
        vec![
            Message::new(Role::System, "one"),
            Message::new(Role::System, "two"),
        ]
    );
}

#[test]
fn it_records_a_warning_when_cancelled() {
    let mut session = SessionState::new(2);
    session.stepper.start();
    session.begin_run();

    let next = session.finish_run(&RunOutcome::Cancelled);

    assert_eq!(next, None);
    assert!(!session.is_running);
    assert!(session.messages.is_empty());
    assert_eq!(session.notices.len(), 1);
    assert_eq!(session.notices[0].level, NoticeLevel::Warning);
    assert_eq!(session.notices[0].text, "Execution was stopped by user");
    assert!(!session.step_completed());
}

#[test]
fn it_records_an_error_when_failed() {
    let mut session = SessionState::new(2);
    session.stepper.start();
    session.begin_run();

    session.finish_run(&RunOutcome::Failed("Connection refused".to_string()));

    assert!(!session.is_running);
    assert_eq!(session.notices[0].level, NoticeLevel::Error);
    assert_eq!(
        session.notices[0].text,
        "Error occurred: Connection refused"
    );
}

#[test]
fn it_keeps_screenshots_when_clearing_the_conversation() {
    let mut session = SessionState::new(2);
    session.apply_output(&text("Hi"));
    session.apply_tool_output(
        &ToolResult {
            base64_image: Some("aGVsbG8=".to_string()),
            ..ToolResult::default()
        },
        "toolu_1",
    );
    session.stepper.start();
    session.finish_run(&RunOutcome::Completed(vec![]));
    session.stepper.next();

    session.clear_conversation();

    assert!(session.messages.is_empty());
    assert_eq!(session.screenshots.len(), 1);
    assert_eq!(session.current_step(), 0);
    assert!(!session.step_completed());

    session.reset_all();
    assert!(session.screenshots.is_empty());
}

#[test]
fn it_tags_every_run_with_a_new_id() {
    let mut session = SessionState::new(2);

    let first = session.begin_run();
    assert!(session.is_current_run(first));
    session.clear_conversation();
    assert!(!session.is_current_run(first));

    let second = session.begin_run();
    assert_ne!(first, second);
    assert!(session.is_current_run(second));
    assert!(!session.is_current_run(first));
}

#[test]
fn it_frees_the_step_when_a_run_is_rejected() {
    let mut session = SessionState::new(2);
    session.stepper.start_all();
    session.begin_run();

    session.reject_run();

    assert!(!session.is_running);
    assert!(!session.stepper.is_executing_all());
    assert_eq!(session.stepper.start(), Some(0));
    assert_eq!(session.notices[0].level, NoticeLevel::Warning);
    assert_eq!(session.notices[0].text, "A run is already in progress");
}
