pub mod project;
pub mod search;
pub mod task;
pub mod team;
pub mod user;

pub use project::*;
pub use search::*;
pub use task::*;
pub use team::*;
pub use user::*;
