use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use super::AgentEvent;
use super::MessageParam;
use super::RunRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ApiProvider {
    Anthropic,
    Bedrock,
    Vertex,
}

impl ApiProvider {
    pub fn parse(text: String) -> Option<ApiProvider> {
        return ApiProvider::iter().find(|e| return e.to_string() == text);
    }
}

/// How a run of the sampling loop ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    /// The model stopped requesting actions. Carries the updated conversation.
    Completed(Vec<MessageParam>),
    /// The run was stopped by the user.
    Cancelled,
    /// The sampling loop failed with the given error.
    Failed(String),
}

#[async_trait]
pub trait SamplingLoop {
    /// Returns the provider this loop talks to.
    fn provider(&self) -> ApiProvider;

    /// Runs the agent loop for the conversation in `request` until the model
    /// stops requesting actions.
    ///
    /// Model output, tool results, and raw API responses are reported through
    /// `tx` as they happen. The updated conversation is returned once the loop
    /// finishes. Dropping the returned future cancels the run.
    async fn sample<'a>(
        &self,
        request: RunRequest,
        tx: &'a mpsc::UnboundedSender<AgentEvent>,
    ) -> Result<Vec<MessageParam>>;
}

pub type SamplingLoopBox = Arc<dyn SamplingLoop + Send + Sync>;
