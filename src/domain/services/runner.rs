#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::api_response::ApiResponse;
use crate::domain::models::Action;
use crate::domain::models::AgentEvent;
use crate::domain::models::Event;
use crate::domain::models::MessageParam;
use crate::domain::models::RunOutcome;
use crate::domain::models::RunRequest;
use crate::domain::models::SamplingLoopBox;

fn forward(run_id: u64, event: AgentEvent, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    match event {
        AgentEvent::Output(block) => {
            tx.send(Event::AgentOutput(run_id, block))?;
        }
        AgentEvent::ToolOutput(result, tool_use_id) => {
            tx.send(Event::AgentToolOutput(run_id, result, tool_use_id))?;
        }
        AgentEvent::ApiResponse(body) => {
            let texts = ApiResponse::content_texts(&body)?;
            tx.send(Event::AgentApiContent(run_id, texts))?;
        }
    }

    return Ok(());
}

/// Drives one run of the sampling loop, forwarding everything it reports to
/// the UI as it happens.
async fn run(
    run_id: u64,
    sampler: SamplingLoopBox,
    request: RunRequest,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<Vec<MessageParam>> {
    let (agent_tx, mut agent_rx) = mpsc::unbounded_channel::<AgentEvent>();

    // The sender lives inside the future so the channel closes once the loop returns.
    let sampling = async move {
        return sampler.sample(request, &agent_tx).await;
    };
    tokio::pin!(sampling);

    let mut result: Option<Result<Vec<MessageParam>>> = None;
    loop {
        tokio::select! {
            res = &mut sampling, if result.is_none() => {
                result = Some(res);
            }
            event = agent_rx.recv() => {
                match event {
                    Some(agent_event) => forward(run_id, agent_event, tx)?,
                    None => break,
                }
            }
        }
    }

    match result {
        Some(res) => return res,
        None => bail!("Sampling loop closed its event channel before finishing"),
    }
}

pub struct RunnerService {}

impl RunnerService {
    /// Serves actions until the action channel closes. At most one run is in
    /// flight at a time; every started run ends with exactly one
    /// `Event::RunFinished` tagged with its id.
    pub async fn start(
        sampler: SamplingLoopBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut worker: Option<(u64, JoinHandle<Result<()>>)> = None;

        loop {
            let Some(action) = rx.recv().await else {
                break;
            };

            match action {
                Action::Run(run_id, request) => {
                    if worker.as_ref().is_some_and(|(_, w)| return !w.is_finished()) {
                        tracing::warn!(run_id, "Rejected run while another one is in flight");
                        tx.send(Event::RunRejected(run_id))?;
                        continue;
                    }

                    tracing::debug!(
                        run_id,
                        model = %request.model,
                        provider = %request.provider,
                        "Starting run"
                    );

                    let worker_tx = tx.clone();
                    let worker_sampler = sampler.clone();
                    let handle = tokio::spawn(async move {
                        let res = run(run_id, worker_sampler, request, &worker_tx).await;
                        let outcome = match res {
                            Ok(messages) => RunOutcome::Completed(messages),
                            Err(err) => {
                                tracing::error!(error = ?err, "Run failed");
                                RunOutcome::Failed(err.to_string())
                            }
                        };

                        worker_tx.send(Event::RunFinished(run_id, outcome))?;
                        return Ok(());
                    });
                    worker = Some((run_id, handle));
                }
                Action::Stop() => {
                    if let Some((run_id, handle)) = worker.take() {
                        if !handle.is_finished() {
                            handle.abort();
                            tracing::debug!(run_id, "Cancelled run");
                            tx.send(Event::RunFinished(run_id, RunOutcome::Cancelled))?;
                        }
                    }
                }
            }
        }

        if let Some((_, handle)) = worker.take() {
            handle.abort();
        }

        return Ok(());
    }
}
