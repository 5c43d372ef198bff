use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use test_utils::api_response_fixture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::RunnerService;
use crate::domain::models::Action;
use crate::domain::models::AgentEvent;
use crate::domain::models::ApiProvider;
use crate::domain::models::ContentBlock;
use crate::domain::models::Event;
use crate::domain::models::MessageParam;
use crate::domain::models::RunOutcome;
use crate::domain::models::RunRequest;
use crate::domain::models::SamplingLoop;
use crate::domain::models::SamplingLoopBox;
use crate::domain::models::ToolResult;

struct ScriptedSampler {
    events: Vec<AgentEvent>,
}

#[async_trait]
impl SamplingLoop for ScriptedSampler {
    fn provider(&self) -> ApiProvider {
        return ApiProvider::Anthropic;
    }

    #[allow(clippy::implicit_return)]
    async fn sample<'a>(
        &self,
        request: RunRequest,
        tx: &'a mpsc::UnboundedSender<AgentEvent>,
    ) -> Result<Vec<MessageParam>> {
        for event in self.events.iter() {
            tx.send(event.clone())?;
        }

        return Ok(request.messages);
    }
}

struct BlockingSampler {}

#[async_trait]
impl SamplingLoop for BlockingSampler {
    fn provider(&self) -> ApiProvider {
        return ApiProvider::Anthropic;
    }

    #[allow(clippy::implicit_return)]
    async fn sample<'a>(
        &self,
        _request: RunRequest,
        _tx: &'a mpsc::UnboundedSender<AgentEvent>,
    ) -> Result<Vec<MessageParam>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        return Ok(vec![]);
    }
}

struct FailingSampler {}

#[async_trait]
impl SamplingLoop for FailingSampler {
    fn provider(&self) -> ApiProvider {
        return ApiProvider::Anthropic;
    }

    #[allow(clippy::implicit_return)]
    async fn sample<'a>(
        &self,
        _request: RunRequest,
        _tx: &'a mpsc::UnboundedSender<AgentEvent>,
    ) -> Result<Vec<MessageParam>> {
        bail!("Connection refused");
    }
}

fn request() -> RunRequest {
    return RunRequest {
        model: "claude-3-5-sonnet-20241022".to_string(),
        provider: ApiProvider::Anthropic,
        system_prompt_suffix: "".to_string(),
        messages: vec![MessageParam::user_instruction("What is 2+2?", None)],
        api_key: "".to_string(),
        only_n_most_recent_images: 10,
        max_tokens: 1024,
    };
}

fn spawn_runner(
    sampler: SamplingLoopBox,
) -> (
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Event>,
    JoinHandle<Result<()>>,
) {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let handle = tokio::spawn(async move {
        return RunnerService::start(sampler, event_tx, &mut action_rx).await;
    });

    return (action_tx, event_rx, handle);
}

#[tokio::test]
async fn it_forwards_events_in_order_then_finishes() -> Result<()> {
    let sampler = Arc::new(ScriptedSampler {
        events: vec![
            AgentEvent::ApiResponse(api_response_fixture().to_string()),
            AgentEvent::Output(ContentBlock::Text {
                text: "Hello".to_string(),
            }),
            AgentEvent::ToolOutput(ToolResult::with_error("Not available"), "toolu_1".to_string()),
        ],
    });
    let (action_tx, mut event_rx, handle) = spawn_runner(sampler);

    action_tx.send(Action::Run(7, request()))?;

    match event_rx.recv().await.unwrap() {
        Event::AgentApiContent(7, texts) => assert_eq!(texts.len(), 2),
        event => bail!("Wrong event {event:?}"),
    }
    match event_rx.recv().await.unwrap() {
        Event::AgentOutput(7, ContentBlock::Text { text }) => assert_eq!(text, "Hello"),
        event => bail!("Wrong event {event:?}"),
    }
    match event_rx.recv().await.unwrap() {
        Event::AgentToolOutput(7, result, tool_use_id) => {
            assert_eq!(result.error, Some("Not available".to_string()));
            assert_eq!(tool_use_id, "toolu_1");
        }
        event => bail!("Wrong event {event:?}"),
    }
    match event_rx.recv().await.unwrap() {
        Event::RunFinished(7, RunOutcome::Completed(messages)) => assert_eq!(messages.len(), 1),
        event => bail!("Wrong event {event:?}"),
    }

    drop(action_tx);
    handle.await??;
    return Ok(());
}

#[tokio::test]
async fn it_reports_failures() -> Result<()> {
    let (action_tx, mut event_rx, _handle) = spawn_runner(Arc::new(FailingSampler {}));

    action_tx.send(Action::Run(1, request()))?;

    match event_rx.recv().await.unwrap() {
        Event::RunFinished(1, RunOutcome::Failed(err)) => assert_eq!(err, "Connection refused"),
        event => bail!("Wrong event {event:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_fails_the_run_on_a_malformed_api_response() -> Result<()> {
    let sampler = Arc::new(ScriptedSampler {
        events: vec![
            AgentEvent::ApiResponse("<html>Bad Gateway</html>".to_string()),
            AgentEvent::Output(ContentBlock::Text {
                text: "Never seen".to_string(),
            }),
        ],
    });
    let (action_tx, mut event_rx, _handle) = spawn_runner(sampler);

    action_tx.send(Action::Run(1, request()))?;

    match event_rx.recv().await.unwrap() {
        Event::RunFinished(1, RunOutcome::Failed(_)) => {}
        event => bail!("Wrong event {event:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_cancels_the_run_in_flight() -> Result<()> {
    let (action_tx, mut event_rx, _handle) = spawn_runner(Arc::new(BlockingSampler {}));

    action_tx.send(Action::Run(1, request()))?;
    action_tx.send(Action::Stop())?;

    match event_rx.recv().await.unwrap() {
        Event::RunFinished(1, RunOutcome::Cancelled) => {}
        event => bail!("Wrong event {event:?}"),
    }

    // The slot is free again.
    action_tx.send(Action::Run(2, request()))?;
    action_tx.send(Action::Stop())?;
    match event_rx.recv().await.unwrap() {
        Event::RunFinished(2, RunOutcome::Cancelled) => {}
        event => bail!("Wrong event {event:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_rejects_a_second_run_while_one_is_in_flight() -> Result<()> {
    let (action_tx, mut event_rx, _handle) = spawn_runner(Arc::new(BlockingSampler {}));

    action_tx.send(Action::Run(1, request()))?;
    action_tx.send(Action::Run(2, request()))?;
    action_tx.send(Action::Stop())?;

    match event_rx.recv().await.unwrap() {
        Event::RunRejected(2) => {}
        event => bail!("Wrong event {event:?}"),
    }
    match event_rx.recv().await.unwrap() {
        Event::RunFinished(1, RunOutcome::Cancelled) => {}
        event => bail!("Wrong event {event:?}"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_ignores_stop_when_nothing_runs() -> Result<()> {
    let (action_tx, mut event_rx, handle) = spawn_runner(Arc::new(BlockingSampler {}));

    action_tx.send(Action::Stop())?;
    drop(action_tx);
    handle.await??;

    assert!(event_rx.recv().await.is_none());
    return Ok(());
}

#[tokio::test]
async fn it_tags_a_cancelled_run_apart_from_the_next_one() -> Result<()> {
    let (action_tx, mut event_rx, _handle) = spawn_runner(Arc::new(BlockingSampler {}));

    // Stop then run again straight away, as a clear followed by a new run does.
    action_tx.send(Action::Run(1, request()))?;
    action_tx.send(Action::Stop())?;
    action_tx.send(Action::Run(2, request()))?;
    match event_rx.recv().await.unwrap() {
        Event::RunFinished(1, RunOutcome::Cancelled) => {}
        event => bail!("Wrong event {event:?}"),
    }
    action_tx.send(Action::Stop())?;
    match event_rx.recv().await.unwrap() {
        Event::RunFinished(2, RunOutcome::Cancelled) => {}
        event => bail!("Wrong event {event:?}"),
    }

    return Ok(());
}
