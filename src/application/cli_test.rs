use anyhow::Result;

use super::build;
use super::help_text;
use crate::configuration::ConfigKey;

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[test]
fn it_parses_the_once_instruction() -> Result<()> {
    let matches =
        build().try_get_matches_from(vec!["clickstep", "once", "-i", "What is on the screen?"])?;

    let (name, subcmd_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "once");
    assert_eq!(
        subcmd_matches.get_one::<String>("instruction").unwrap(),
        "What is on the screen?"
    );
    return Ok(());
}

#[test]
fn it_requires_an_instruction_for_once() {
    assert!(build()
        .try_get_matches_from(vec!["clickstep", "once"])
        .is_err());
}

#[test]
fn it_accepts_global_options_after_the_subcommand() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "clickstep",
        "prompt",
        "--provider",
        "anthropic",
        "--max-tokens",
        "1024",
    ])?;

    let (_, subcmd_matches) = matches.subcommand().unwrap();
    assert_eq!(
        subcmd_matches
            .get_one::<String>(&ConfigKey::Provider.to_string())
            .unwrap(),
        "anthropic"
    );
    assert_eq!(
        subcmd_matches
            .get_one::<String>(&ConfigKey::MaxTokens.to_string())
            .unwrap(),
        "1024"
    );
    return Ok(());
}

#[test]
fn it_rejects_unknown_providers() {
    assert!(build()
        .try_get_matches_from(vec!["clickstep", "--provider", "openai"])
        .is_err());
}

#[test]
fn it_documents_every_hotkey_section() {
    let text = help_text();

    assert!(text.starts_with("STEPS HOTKEYS:"));
    assert!(text.contains("PROMPT HOTKEYS:"));
    assert!(text.contains("- 1-9: Download a screenshot."));
}
