pub mod registration;

pub(crate) mod repository;
mod root;

pub use repository::{Event, find_event};
pub use root::*;
