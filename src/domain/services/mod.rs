pub mod api_response;
mod app_state;
pub mod events;
mod renderer;
pub mod runner;
mod screenshots;
mod scroll;
mod session;
mod stepper;

pub use app_state::*;
pub use renderer::*;
pub use screenshots::*;
pub use scroll::*;
pub use session::*;
pub use stepper::*;
