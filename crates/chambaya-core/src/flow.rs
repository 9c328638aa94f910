//! Login flows: authenticate, store the session, pick the next screen.

use std::time::Duration;

use anyhow::{Context, Result};
use chambaya_types::{Credentials, LoginResponse, User};

use crate::api::ApiClient;
use crate::navigation::NavigationDecision;
use crate::resolver::PostAuthResolver;

/// Result of a completed login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub decision: NavigationDecision,
}

/// How the user proves who they are.
#[derive(Debug, Clone)]
pub enum LoginMethod {
    Password { email: String, password: String },
    Google { id: String },
}

/// Authenticates, stores the session and resolves the next screen.
///
/// # Errors
/// Returns an error if authentication fails or the session cannot be
/// persisted. Work-status failures never surface here.
pub async fn login(
    client: &ApiClient,
    method: &LoginMethod,
    delay: Duration,
) -> Result<LoginOutcome> {
    let response = match method {
        LoginMethod::Password { email, password } => client
            .login(&Credentials::password(email, password))
            .await
            .context("Login failed")?,
        LoginMethod::Google { id } => client
            .google_login(id)
            .await
            .context("Google login failed")?,
    };

    complete_login(client, response, delay).await
}

/// Stores a fresh session and resolves where to go next.
///
/// # Errors
/// Returns an error if the session cannot be persisted.
pub async fn complete_login(
    client: &ApiClient,
    response: LoginResponse,
    delay: Duration,
) -> Result<LoginOutcome> {
    let LoginResponse { token, user } = response;
    client
        .session()
        .set_auth(token, user.clone())
        .context("Failed to save session")?;

    let decision = PostAuthResolver::new(client.clone(), delay)
        .run(&user)
        .await;
    Ok(LoginOutcome { user, decision })
}

/// Re-runs the resolver for the stored session.
///
/// # Errors
/// Returns an error if there is no stored session.
pub async fn resume(client: &ApiClient, delay: Duration) -> Result<LoginOutcome> {
    let snapshot = client.session().snapshot();
    let Some(user) = snapshot.user.filter(|_| snapshot.token.is_some()) else {
        anyhow::bail!("Not logged in. Run `chambaya login` first.");
    };

    let decision = PostAuthResolver::new(client.clone(), delay)
        .run(&user)
        .await;
    Ok(LoginOutcome { user, decision })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::navigation::Route;
    use crate::session::{MemoryStorage, SessionStore};

    fn client(server: &MockServer) -> ApiClient {
        let session = Arc::new(SessionStore::new(MemoryStorage::new()));
        ApiClient::new(server.uri(), Duration::from_secs(5), session).unwrap()
    }

    #[tokio::test]
    async fn test_login_stores_session_then_resolves_with_new_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "tok-new",
                "user": {"id": "U1", "role": "worker", "profileCompleted": true, "acceptTerms": true}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/works/isWorkOpen"))
            .and(header("authorization", "Bearer tok-new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "role": "worker",
                    "completionStatus": {"workerConfirmed": false},
                    "employerId": "E1",
                    "workId": "W1",
                    "workerId": "U1"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let creds = LoginMethod::Password {
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
        };
        let outcome = login(&client, &creds, Duration::ZERO).await.unwrap();

        assert_eq!(client.session().token().as_deref(), Some("tok-new"));
        assert_eq!(outcome.user.id, "U1");
        assert_eq!(outcome.decision.destination().name(), "rating");
        assert_eq!(outcome.decision.destination().param("employerId").as_deref(), Some("E1"));
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_session_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Credenciales inválidas"})),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let creds = LoginMethod::Password {
            email: "ana@example.com".to_string(),
            password: "bad".to_string(),
        };
        let err = login(&client, &creds, Duration::ZERO).await.unwrap_err();

        assert!(format!("{err:#}").contains("Credenciales inválidas"));
        assert_eq!(client.session().token(), None);
    }

    #[tokio::test]
    async fn test_work_status_failure_still_routes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/works/isWorkOpen"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client(&server);
        let response = LoginResponse {
            token: "tok".to_string(),
            user: User {
                id: "U1".to_string(),
                profile_completed: Some(false),
                ..User::default()
            },
        };
        let outcome = complete_login(&client, response, Duration::ZERO).await.unwrap();
        assert_eq!(outcome.decision.destination(), &Route::Onboarding);
    }

    #[tokio::test]
    async fn test_resume_requires_session() {
        let server = MockServer::start().await;
        let client = client(&server);
        let err = resume(&client, Duration::ZERO).await.unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
    }
}
