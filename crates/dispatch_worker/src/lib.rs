pub mod dispatch_worker;
pub mod domain;
pub mod worker;

pub use dispatch_worker::*;
pub use domain::*;
pub use worker::*;
