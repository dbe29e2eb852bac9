pub use super::attachment::Entity as Attachment;
pub use super::comment::Entity as Comment;
pub use super::project::Entity as Project;
pub use super::task::Entity as Task;
pub use super::team::Entity as Team;
pub use super::user::Entity as User;
