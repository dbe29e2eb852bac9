pub mod project;
pub mod task;
pub mod team;
pub mod user;

pub use project::ProjectRepository;
pub use task::{Expand, TaskRepository};
pub use team::TeamRepository;
pub use user::UserRepository;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, DatabaseConnection};

use crate::error::AppResult;

/// Base repository trait for common read operations
#[async_trait]
pub trait Repository<T>
where
    T: Send + Sync,
{
    /// List all entities, oldest first
    async fn list(db: &DatabaseConnection) -> AppResult<Vec<T>>;
}

/// `column LIKE '%query%'` with `%`, `_` and `\` in the query matched literally
pub(crate) fn contains_literal<C: ColumnTrait>(column: C, query: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(query));
    Expr::col(column).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
