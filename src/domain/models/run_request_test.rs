use super::parse_max_tokens;
use super::RunSettings;
use crate::domain::models::ApiProvider;
use crate::domain::models::MessageParam;

#[test]
fn it_parses_max_tokens_within_bounds() {
    assert_eq!(parse_max_tokens("1").unwrap(), 1);
    assert_eq!(parse_max_tokens(" 4096 ").unwrap(), 4096);
}

#[test]
fn it_rejects_max_tokens_out_of_bounds() {
    assert!(parse_max_tokens("0").is_err());
    assert!(parse_max_tokens("4097").is_err());
    assert!(parse_max_tokens("lots").is_err());

    let err = parse_max_tokens("5000").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Max tokens must be between 1 and 4096, got 5000");
}

#[test]
fn it_builds_requests_with_an_empty_api_key() {
    let settings = RunSettings {
        model: "anthropic.claude-3-5-sonnet-20241022-v2:0".to_string(),
        provider: ApiProvider::Bedrock,
        system_prompt_suffix: "This is a mac device".to_string(),
        only_n_most_recent_images: 10,
        max_tokens: 4096,
    };

    let request = settings.request(vec![MessageParam::user_instruction("Hi", None)]);

    assert_eq!(request.model, settings.model);
    assert_eq!(request.provider, ApiProvider::Bedrock);
    assert_eq!(request.system_prompt_suffix, "This is a mac device");
    assert_eq!(request.messages.len(), 1);
    assert!(request.api_key.is_empty());
    assert_eq!(request.only_n_most_recent_images, 10);
    assert_eq!(request.max_tokens, 4096);
}
