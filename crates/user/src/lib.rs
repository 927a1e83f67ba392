pub(crate) mod repository;
mod root;

pub use repository::{User, find_user};
pub use root::*;
