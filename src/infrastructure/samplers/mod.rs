pub mod anthropic;

use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::ApiProvider;
use crate::domain::models::SamplingLoopBox;

pub struct SamplerManager {}

impl SamplerManager {
    pub fn get(provider: ApiProvider) -> Result<SamplingLoopBox> {
        if provider == ApiProvider::Anthropic || provider == ApiProvider::Bedrock {
            return Ok(Arc::new(anthropic::MessagesLoop::new(provider)));
        }

        bail!(format!("No sampling loop implemented for {provider}"))
    }
}
