use super::Message;
use crate::domain::models::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::Assistant, "Hi there!");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.role.to_string(), "assistant");
    assert_eq!(msg.text, "Hi there!".to_string());
}

#[test]
fn it_executes_new_replacing_tabs() {
    let msg = Message::new(Role::Tool, "\t\tTool Output: done");
    assert_eq!(msg.text, "    Tool Output: done".to_string());
}

#[test]
fn it_formats_with_role_prefix() {
    assert_eq!(
        Message::new(Role::Assistant, "Hello").formatted(),
        "🤖 Assistant: Hello"
    );
    assert_eq!(
        Message::new(Role::System, "Hello").formatted(),
        "💻 System: Hello"
    );
    assert_eq!(
        Message::new(Role::Tool, "Tool Output: ok").formatted(),
        "🔧 Tool Output: ok"
    );
    assert_eq!(
        Message::new(Role::Error, "Error: nope").formatted(),
        "❌ Error: nope"
    );
}

#[test]
fn it_wraps_lines_on_spaces() {
    let msg = Message::new(Role::Tool, "one two three four five");
    let lines = msg.as_string_lines(10);

    assert_eq!(lines, vec!["🔧 one two", "three four", "five"]);
}

#[test]
fn it_keeps_blank_lines() {
    let msg = Message::new(Role::Tool, "first\n\nsecond");
    let lines = msg.as_string_lines(40);

    assert_eq!(lines, vec!["🔧 first", " ", "second"]);
}

#[test]
fn it_cuts_words_longer_than_a_line() {
    let msg = Message::new(Role::Tool, "abcdefghijkl");
    let lines = msg.as_string_lines(5);

    assert_eq!(lines, vec!["🔧", "abcde", "fghij", "kl"]);
}
