mod action;
mod agent_event;
mod event;
mod frontend;
mod instruction_store;
mod loading;
mod message;
mod notice;
mod payload;
mod role;
mod run_request;
mod sampling_loop;
mod screenshot;
mod textarea;
mod tool_result;

pub use action::*;
pub use agent_event::*;
pub use event::*;
pub use frontend::*;
pub use instruction_store::*;
pub use loading::*;
pub use message::*;
pub use notice::*;
pub use payload::*;
pub use role::*;
pub use run_request::*;
pub use sampling_loop::*;
pub use screenshot::*;
pub use textarea::*;
pub use tool_result::*;
