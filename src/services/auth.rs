use color_eyre::Result;
use serde::Deserialize;

use crate::db::Db;
use crate::names;

// ---------------------------------------------------------------------------
// SessionRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct OAuthProfile {
    pub login: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
pub trait SessionRepository: Send + Sync {
    fn upsert_oauth_user(
        &self,
        profile: &OAuthProfile,
        display_name: &str,
    ) -> impl std::future::Future<Output = Result<i32>> + Send;

    fn create_user_session(
        &self,
        user_id: i32,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn delete_user_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

impl SessionRepository for Db {
    async fn upsert_oauth_user(
        &self,
        profile: &OAuthProfile,
        display_name: &str,
    ) -> Result<i32> {
        Db::upsert_oauth_user(self, &profile.login, profile.email.as_deref(), display_name).await
    }

    async fn create_user_session(&self, user_id: i32) -> Result<String> {
        Db::create_user_session(self, user_id).await
    }

    async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        Db::delete_user_session(self, session_id).await
    }
}

// ---------------------------------------------------------------------------
// OAuthProvider trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait OAuthProvider: Send + Sync {
    /// Where to send the browser to start the flow.
    fn authorize_url(&self, state: &str) -> String;

    fn exchange_code(
        &self,
        code: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn fetch_profile(
        &self,
        access_token: &str,
    ) -> impl std::future::Future<Output = Result<OAuthProfile>> + Send;
}

/// GitHub implementation of the OAuth provider.
#[derive(Clone)]
pub struct GithubOAuth {
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

impl GithubOAuth {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            http: reqwest::Client::new(),
        }
    }
}

impl OAuthProvider for GithubOAuth {
    fn authorize_url(&self, state: &str) -> String {
        format!(
            "https://github.com/login/oauth/authorize?client_id={}&state={}",
            self.client_id, state
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<String> {
        let resp: AccessTokenResponse = self
            .http
            .post("https://github.com/login/oauth/access_token")
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await?
            .json()
            .await?;

        match resp.access_token {
            Some(token) => Ok(token),
            None => {
                let detail = resp
                    .error_description
                    .unwrap_or_else(|| "no access token in response".to_string());
                color_eyre::eyre::bail!("GitHub token exchange failed: {detail}")
            }
        }
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<OAuthProfile> {
        // GitHub's API rejects requests without a User-Agent.
        let profile: OAuthProfile = self
            .http
            .get("https://api.github.com/user")
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, "cramdeck")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(profile)
    }
}

// ---------------------------------------------------------------------------
// Outcome enums
// ---------------------------------------------------------------------------

pub enum LoginOutcome {
    /// Login succeeded. Contains the session token.
    Success(String),
    /// The GitHub account exists but is not on the allow-list.
    NotAllowed(String),
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<R: SessionRepository = Db, P: OAuthProvider = GithubOAuth> {
    repo: R,
    oauth: P,
}

impl<R: SessionRepository + Clone, P: OAuthProvider + Clone> Clone for AuthService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            oauth: self.oauth.clone(),
        }
    }
}

impl<R: SessionRepository, P: OAuthProvider> AuthService<R, P> {
    pub fn new(repo: R, oauth: P) -> Self {
        Self { repo, oauth }
    }

    pub fn authorize_url(&self, state: &str) -> String {
        self.oauth.authorize_url(state)
    }

    /// Complete the OAuth flow: exchange the code, fetch the profile, apply
    /// the allow-list, then mint a session.
    pub async fn login_with_code(&self, code: &str) -> Result<LoginOutcome> {
        let access_token = self.oauth.exchange_code(code).await?;
        let profile = self.oauth.fetch_profile(&access_token).await?;

        if !names::ALLOWED_USERS.contains(&profile.login.as_str()) {
            tracing::warn!("login rejected for GitHub user '{}'", profile.login);
            return Ok(LoginOutcome::NotAllowed(profile.login));
        }

        let display_name = profile
            .name
            .clone()
            .unwrap_or_else(|| profile.login.clone());
        let user_id = self.repo.upsert_oauth_user(&profile, &display_name).await?;

        let session_token = self.repo.create_user_session(user_id).await?;

        tracing::info!("login succeeded for GitHub user '{}'", profile.login);
        Ok(LoginOutcome::Success(session_token))
    }

    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.repo.delete_user_session(session_id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mock_oauth(login: &str) -> MockOAuthProvider {
        let login = login.to_string();
        let mut mock = MockOAuthProvider::new();
        mock.expect_exchange_code()
            .returning(|_| Box::pin(async { Ok("gh-token".to_string()) }));
        mock.expect_fetch_profile().returning(move |_| {
            let login = login.clone();
            Box::pin(async move {
                Ok(OAuthProfile {
                    login,
                    email: Some("user@example.com".to_string()),
                    name: None,
                })
            })
        });
        mock
    }

    #[tokio::test]
    async fn allowed_login_creates_user_and_session() {
        let mut repo = MockSessionRepository::new();
        repo.expect_upsert_oauth_user()
            .withf(|profile, display_name| {
                profile.login == names::ALLOWED_USERS[0]
                    && profile.email.as_deref() == Some("user@example.com")
                    // No profile name set: display name falls back to login.
                    && display_name == names::ALLOWED_USERS[0]
            })
            .returning(|_, _| Box::pin(async { Ok(7) }));
        repo.expect_create_user_session()
            .withf(|user_id| *user_id == 7)
            .returning(|_| Box::pin(async { Ok("session-token-123".to_string()) }));

        let svc = AuthService::new(repo, mock_oauth(names::ALLOWED_USERS[0]));
        let outcome = svc.login_with_code("code").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::Success(ref t) if t == "session-token-123"));
    }

    #[tokio::test]
    async fn unlisted_login_is_rejected_without_touching_the_repo() {
        let repo = MockSessionRepository::new();

        let svc = AuthService::new(repo, mock_oauth("some-stranger"));
        let outcome = svc.login_with_code("code").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::NotAllowed(ref l) if l == "some-stranger"));
    }

    #[tokio::test]
    async fn exchange_failure_propagates() {
        let mut oauth = MockOAuthProvider::new();
        oauth
            .expect_exchange_code()
            .returning(|_| Box::pin(async { Err(color_eyre::eyre::eyre!("exchange failed")) }));

        let svc = AuthService::new(MockSessionRepository::new(), oauth);
        assert!(svc.login_with_code("code").await.is_err());
    }
}
