pub mod dispatch;
pub mod error;
pub mod event;
pub mod object_key;
pub mod rules;
pub mod talkgroups;

pub use dispatch::*;
pub use error::{DomainError, DomainResult};
pub use event::*;
pub use object_key::*;
pub use rules::call_is_trail_rescue;
pub use talkgroups::*;
