//! Per-request user propagation for row-level security.
//!
//! The policies in `migrations/0002_row_level_security.sql` read the
//! `request.user_id` setting. The authenticated user id is carried in a
//! task-local so the pool can stamp it onto every connection it hands out
//! (see the `before_acquire` hook in the API's database setup). Outside a
//! scope the setting is cleared and the policies see NULL, which denies
//! every row.
//!
//! The serving role must not own the tables: owners bypass row-level
//! security. Run migrations as the owner and serve with a separate role.

use std::future::Future;

use uuid::Uuid;

tokio::task_local! {
    static REQUEST_USER: Uuid;
}

/// Run `fut` with `user_id` visible to every connection acquired within it.
pub async fn with_request_user<F>(user_id: Uuid, fut: F) -> F::Output
where
    F: Future,
{
    REQUEST_USER.scope(user_id, fut).await
}

/// The user id of the surrounding request scope, if any.
pub fn request_user() -> Option<Uuid> {
    REQUEST_USER.try_with(|id| *id).ok()
}

/// Stamp the scoped user onto a freshly acquired connection.
///
/// Session-level rather than transaction-local, so single statements outside
/// a transaction are covered too. Every checkout overwrites the previous
/// value, so a recycled connection never carries another request's user.
pub async fn apply_request_user(conn: &mut sqlx::PgConnection) -> Result<(), sqlx::Error> {
    let user = request_user().map(|id| id.to_string()).unwrap_or_default();
    sqlx::query("SELECT set_config('request.user_id', $1, false)")
        .bind(user)
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scope_exposes_user_to_nested_calls() {
        assert_eq!(request_user(), None);

        let id = Uuid::new_v4();
        let seen = with_request_user(id, async { request_user() }).await;

        assert_eq!(seen, Some(id));
        assert_eq!(request_user(), None);
    }

    #[tokio::test]
    async fn inner_scope_shadows_outer() {
        let outer = Uuid::new_v4();
        let inner = Uuid::new_v4();

        let seen = with_request_user(outer, async move {
            with_request_user(inner, async { request_user() }).await
        })
        .await;

        assert_eq!(seen, Some(inner));
    }
}
