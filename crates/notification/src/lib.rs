mod content;
mod dispatcher;
mod mailer;
mod notification;
mod queue;
pub(crate) mod repository;
mod scheduler;
mod service;
mod storage;
mod worker;

pub use dispatcher::*;
pub use mailer::*;
pub use notification::*;
pub use queue::*;
pub use scheduler::*;
pub use service::*;
pub use storage::*;
pub use worker::*;
