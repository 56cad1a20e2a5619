mod dispatch_service;
mod error;
mod gate;
mod retry;
mod select;
mod tactical_service;
mod thread_registry;

pub use dispatch_service::DispatchService;
pub use error::{WorkerError, WorkerResult};
pub use gate::{AdornedKey, AllowListGate, ALLOWED_TALKGROUPS_KEY};
pub use retry::post_with_throttle_retry;
pub use select::select_trail_rescue_message;
pub use tactical_service::TacticalService;
pub use thread_registry::ThreadRegistry;
