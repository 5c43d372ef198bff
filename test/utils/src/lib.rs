/// A 1x1 transparent PNG.
pub fn png_fixture_base64() -> &'static str {
    return "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";
}

pub fn api_response_fixture() -> &'static str {
    return r#"
{
  "id": "msg_01XFDUDYJgAACzvnptvVoYEL",
  "type": "message",
  "role": "assistant",
  "model": "claude-3-5-sonnet-20241022",
  "content": [
    {
      "type": "text",
      "text": "I can see a desktop with a terminal open."
    },
    {
      "type": "text",
      "text": "Let me take a closer look."
    }
  ],
  "stop_reason": "end_turn",
  "stop_sequence": null,
  "usage": {
    "input_tokens": 2095,
    "output_tokens": 503
  }
}
"#
    .trim();
}

pub fn tool_use_response_fixture() -> &'static str {
    return r#"
{
  "id": "msg_01Aq9w938a90dw8q",
  "type": "message",
  "role": "assistant",
  "model": "claude-3-5-sonnet-20241022",
  "content": [
    {
      "type": "text",
      "text": "I'll take a screenshot first."
    },
    {
      "type": "tool_use",
      "id": "toolu_01A09q90qw90lq917835lq9",
      "name": "computer",
      "input": { "action": "screenshot" }
    }
  ],
  "stop_reason": "tool_use",
  "stop_sequence": null,
  "usage": {
    "input_tokens": 1200,
    "output_tokens": 80
  }
}
"#
    .trim();
}
