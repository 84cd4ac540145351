use color_eyre::Result;
use ulid::Ulid;

use super::models::AuthUser;
use super::Db;

impl Db {
    /// Create or refresh a user row from a GitHub profile. Login is the
    /// stable key; email and display name follow whatever GitHub reports.
    pub async fn upsert_oauth_user(
        &self,
        login: &str,
        email: Option<&str>,
        display_name: &str,
    ) -> Result<i32> {
        let user_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (login, email, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (login)
            DO UPDATE SET email = EXCLUDED.email, display_name = EXCLUDED.display_name
            RETURNING id
            "#,
        )
        .bind(login)
        .bind(email)
        .bind(display_name)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("user upserted: id={user_id}, login={login}");
        Ok(user_id)
    }

    pub async fn create_user_session(&self, user_id: i32) -> Result<String> {
        let session = Ulid::new().to_string();

        sqlx::query("INSERT INTO user_sessions (id, user_id) VALUES ($1, $2)")
            .bind(&session)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.login, u.email, u.display_name
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
