//! Post-authentication routing.
//!
//! After a login the client asks the server whether the user has work
//! awaiting confirmation, then picks exactly one destination. The rules
//! live in [`resolve`], a pure function; [`PostAuthResolver`] only adds
//! the delay and the fetch around it.

use std::time::Duration;

use async_trait::async_trait;
use chambaya_types::{Role, User, WorkStatusSnapshot};

use crate::api::{ApiClient, ApiResult};
use crate::navigation::{NavigationDecision, Prompt, Route};

const PENDING_WORK_TITLE: &str = "¡Bienvenido de nuevo!";
const PENDING_WORK_ACTION: &str = "Finalizar Trabajo";
const WELCOME_TITLE: &str = "¡Inicio de sesión exitoso!";
const WELCOME_HOME_MESSAGE: &str = "Bienvenido de nuevo.";
const WELCOME_HOME_ACTION: &str = "Continuar";
const WELCOME_ONBOARDING_MESSAGE: &str = "Completa tu perfil.";
const WELCOME_ONBOARDING_ACTION: &str = "Completar Perfil";

/// Source of the active-work snapshot.
#[async_trait]
pub trait WorkStatusSource: Send + Sync {
    async fn work_status(&self) -> ApiResult<WorkStatusSnapshot>;
}

#[async_trait]
impl WorkStatusSource for ApiClient {
    async fn work_status(&self) -> ApiResult<WorkStatusSnapshot> {
        ApiClient::work_status(self).await
    }
}

/// Picks the post-login destination.
///
/// `work_status` is `None` when the snapshot could not be fetched; that
/// case falls through to the welcome prompt. Confirmation flags only
/// count when explicitly `false`.
pub fn resolve(user: &User, work_status: Option<&WorkStatusSnapshot>) -> NavigationDecision {
    if let Some(snapshot) = work_status {
        if let Some(route) = pending_rating(user, snapshot) {
            return NavigationDecision::Navigate(route);
        }

        if let Some(active) = snapshot.first_work().filter(|w| w.is_in_progress()) {
            let title = active.work_title.clone().unwrap_or_default();
            return NavigationDecision::Prompt(Prompt {
                title: PENDING_WORK_TITLE.to_string(),
                message: format!("Tienes un trabajo pendiente: \"{title}\""),
                primary_label: PENDING_WORK_ACTION.to_string(),
                primary: Route::WorkCompletion {
                    work_id: active.work_id.clone(),
                    application_id: active.application_id.clone(),
                    work_title: active.work_title.clone(),
                },
            });
        }
    }

    welcome(user)
}

fn pending_rating(user: &User, snapshot: &WorkStatusSnapshot) -> Option<Route> {
    let rater = snapshot.role.unwrap_or(user.role);
    let unconfirmed = match rater {
        Role::Worker => snapshot.worker_confirmed() == Some(false),
        Role::Employer => snapshot.employer_confirmed() == Some(false),
        Role::Both | Role::Unknown => false,
    };

    unconfirmed.then(|| Route::Rating {
        rater,
        employer_id: snapshot.employer_id.clone(),
        work_id: snapshot.work_id.clone(),
        worker_id: snapshot.worker_id.clone(),
    })
}

fn welcome(user: &User) -> NavigationDecision {
    let (message, label, route) = if user.is_onboarded() {
        (WELCOME_HOME_MESSAGE, WELCOME_HOME_ACTION, Route::Home)
    } else {
        (
            WELCOME_ONBOARDING_MESSAGE,
            WELCOME_ONBOARDING_ACTION,
            Route::Onboarding,
        )
    };

    NavigationDecision::Prompt(Prompt {
        title: WELCOME_TITLE.to_string(),
        message: message.to_string(),
        primary_label: label.to_string(),
        primary: route,
    })
}

/// Fetches the work status and resolves the destination.
#[derive(Debug, Clone)]
pub struct PostAuthResolver<S> {
    source: S,
    delay: Duration,
}

impl<S: WorkStatusSource> PostAuthResolver<S> {
    pub fn new(source: S, delay: Duration) -> Self {
        Self { source, delay }
    }

    /// Waits the configured delay, queries the work status and decides.
    ///
    /// Never fails: a failed query is logged and treated as "no pending work".
    pub async fn run(&self, user: &User) -> NavigationDecision {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let snapshot = match self.source.work_status().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(kind = %e.kind, error = %e, "work status unavailable, using default route");
                None
            }
        };

        let decision = resolve(user, snapshot.as_ref());
        tracing::info!(route = decision.destination().name(), "post-auth route resolved");
        decision
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chambaya_types::{ActiveWork, CompletionStatus};

    use super::*;
    use crate::api::{ApiError, ApiErrorKind};

    fn user(role: Role, profile_completed: Option<bool>, accept_terms: Option<bool>) -> User {
        User {
            id: "U1".to_string(),
            role,
            profile_completed,
            accept_terms,
            ..User::default()
        }
    }

    fn ids(snapshot: WorkStatusSnapshot) -> WorkStatusSnapshot {
        WorkStatusSnapshot {
            employer_id: Some("E1".to_string()),
            work_id: Some("W1".to_string()),
            worker_id: Some("U1".to_string()),
            ..snapshot
        }
    }

    fn in_progress_work() -> ActiveWork {
        ActiveWork {
            work_id: Some("W2".to_string()),
            work_title: Some("Pintar casa".to_string()),
            status: Some("in_progress".to_string()),
            application_id: Some("A2".to_string()),
            ..ActiveWork::default()
        }
    }

    /// Work-status source returning a canned result.
    struct FakeSource {
        result: Mutex<Option<ApiResult<WorkStatusSnapshot>>>,
    }

    impl FakeSource {
        fn ok(snapshot: WorkStatusSnapshot) -> Self {
            Self {
                result: Mutex::new(Some(Ok(snapshot))),
            }
        }

        fn failing() -> Self {
            Self {
                result: Mutex::new(Some(Err(ApiError::new(
                    ApiErrorKind::Network,
                    "connection refused",
                )))),
            }
        }
    }

    #[async_trait]
    impl WorkStatusSource for FakeSource {
        async fn work_status(&self) -> ApiResult<WorkStatusSnapshot> {
            self.result
                .lock()
                .unwrap()
                .take()
                .expect("work status queried once")
        }
    }

    #[test]
    fn test_worker_unconfirmed_goes_to_rating() {
        let snapshot = ids(WorkStatusSnapshot {
            role: Some(Role::Worker),
            completion_status: Some(CompletionStatus {
                worker_confirmed: Some(false),
                employer_confirmed: None,
            }),
            ..WorkStatusSnapshot::default()
        });

        let decision = resolve(&user(Role::Worker, None, None), Some(&snapshot));
        let NavigationDecision::Navigate(route) = decision else {
            panic!("expected direct navigation, got {decision:?}");
        };
        assert_eq!(route.name(), "rating");
        assert_eq!(
            route.params(),
            vec![
                ("employerId", "E1".to_string()),
                ("workId", "W1".to_string()),
                ("workerId", "U1".to_string()),
            ]
        );
    }

    #[test]
    fn test_employer_unconfirmed_uses_employer_order() {
        let snapshot = ids(WorkStatusSnapshot {
            role: Some(Role::Employer),
            completion_status: Some(CompletionStatus {
                worker_confirmed: Some(true),
                employer_confirmed: Some(false),
            }),
            ..WorkStatusSnapshot::default()
        });

        let decision = resolve(&user(Role::Employer, None, None), Some(&snapshot));
        let keys: Vec<_> = decision
            .destination()
            .params()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(decision.prompt(), None);
        assert_eq!(keys, ["workerId", "workId", "employerId"]);
    }

    #[test]
    fn test_worker_rating_wins_over_in_progress_work() {
        let snapshot = ids(WorkStatusSnapshot {
            role: Some(Role::Worker),
            completion_status: Some(CompletionStatus {
                worker_confirmed: Some(false),
                employer_confirmed: None,
            }),
            works: Some(vec![in_progress_work()]),
            ..WorkStatusSnapshot::default()
        });

        let decision = resolve(&user(Role::Worker, Some(true), Some(true)), Some(&snapshot));
        assert!(matches!(
            decision,
            NavigationDecision::Navigate(Route::Rating { rater: Role::Worker, .. })
        ));
        assert_eq!(decision.prompt(), None);
    }

    #[test]
    fn test_employer_rating_wins_over_in_progress_work() {
        let snapshot = ids(WorkStatusSnapshot {
            role: Some(Role::Employer),
            completion_status: Some(CompletionStatus {
                worker_confirmed: None,
                employer_confirmed: Some(false),
            }),
            works: Some(vec![in_progress_work()]),
            ..WorkStatusSnapshot::default()
        });

        let decision = resolve(&user(Role::Employer, Some(true), Some(true)), Some(&snapshot));
        assert!(matches!(
            decision,
            NavigationDecision::Navigate(Route::Rating { rater: Role::Employer, .. })
        ));
        assert_eq!(decision.prompt(), None);
    }

    #[test]
    fn test_absent_flag_is_not_false() {
        let snapshot = ids(WorkStatusSnapshot {
            role: Some(Role::Worker),
            completion_status: Some(CompletionStatus::default()),
            ..WorkStatusSnapshot::default()
        });

        let decision = resolve(&user(Role::Worker, Some(true), Some(true)), Some(&snapshot));
        assert_eq!(decision.destination(), &Route::Home);
    }

    #[test]
    fn test_other_role_flag_is_ignored() {
        // A worker is not sent to rating because the employer has not confirmed.
        let snapshot = ids(WorkStatusSnapshot {
            role: Some(Role::Worker),
            completion_status: Some(CompletionStatus {
                worker_confirmed: Some(true),
                employer_confirmed: Some(false),
            }),
            ..WorkStatusSnapshot::default()
        });

        let decision = resolve(&user(Role::Worker, Some(true), Some(true)), Some(&snapshot));
        assert_eq!(decision.destination(), &Route::Home);
    }

    #[test]
    fn test_role_falls_back_to_session_user() {
        let snapshot = ids(WorkStatusSnapshot {
            role: None,
            completion_status: Some(CompletionStatus {
                worker_confirmed: Some(false),
                employer_confirmed: None,
            }),
            ..WorkStatusSnapshot::default()
        });

        let decision = resolve(&user(Role::Worker, None, None), Some(&snapshot));
        assert_eq!(decision.destination().name(), "rating");
    }

    #[test]
    fn test_in_progress_work_prompts_completion() {
        let snapshot = WorkStatusSnapshot {
            role: Some(Role::Worker),
            completion_status: Some(CompletionStatus {
                worker_confirmed: Some(true),
                employer_confirmed: None,
            }),
            works: Some(vec![in_progress_work()]),
            ..WorkStatusSnapshot::default()
        };

        let decision = resolve(&user(Role::Worker, Some(true), Some(true)), Some(&snapshot));
        let prompt = decision.prompt().expect("completion prompt");
        assert_eq!(prompt.title, "¡Bienvenido de nuevo!");
        assert_eq!(prompt.message, "Tienes un trabajo pendiente: \"Pintar casa\"");
        assert_eq!(prompt.primary_label, "Finalizar Trabajo");
        assert_eq!(
            prompt.primary,
            Route::WorkCompletion {
                work_id: Some("W2".to_string()),
                application_id: Some("A2".to_string()),
                work_title: Some("Pintar casa".to_string()),
            }
        );
    }

    #[test]
    fn test_only_first_work_is_considered() {
        let finished = ActiveWork {
            status: Some("completed".to_string()),
            ..in_progress_work()
        };
        let snapshot = WorkStatusSnapshot {
            works: Some(vec![finished, in_progress_work()]),
            ..WorkStatusSnapshot::default()
        };

        let decision = resolve(&user(Role::Worker, Some(true), Some(true)), Some(&snapshot));
        assert_eq!(decision.destination(), &Route::Home);
    }

    #[test]
    fn test_onboarded_user_gets_home_welcome() {
        let decision = resolve(&user(Role::Worker, Some(true), Some(true)), None);
        let prompt = decision.prompt().expect("welcome prompt");
        assert_eq!(prompt.title, "¡Inicio de sesión exitoso!");
        assert_eq!(prompt.message, "Bienvenido de nuevo.");
        assert_eq!(prompt.primary_label, "Continuar");
        assert_eq!(prompt.primary, Route::Home);
    }

    #[test]
    fn test_incomplete_profile_gets_onboarding() {
        for (profile, terms) in [(Some(false), Some(true)), (Some(true), None), (None, None)] {
            let decision = resolve(&user(Role::Employer, profile, terms), None);
            let prompt = decision.prompt().expect("welcome prompt");
            assert_eq!(prompt.message, "Completa tu perfil.");
            assert_eq!(prompt.primary_label, "Completar Perfil");
            assert_eq!(prompt.primary, Route::Onboarding);
        }
    }

    #[tokio::test]
    async fn test_run_degrades_on_fetch_failure() {
        let resolver = PostAuthResolver::new(FakeSource::failing(), Duration::ZERO);
        let decision = resolver
            .run(&user(Role::Worker, Some(false), Some(true)))
            .await;
        assert_eq!(decision.destination(), &Route::Onboarding);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_before_querying() {
        let snapshot = ids(WorkStatusSnapshot {
            role: Some(Role::Employer),
            completion_status: Some(CompletionStatus {
                worker_confirmed: None,
                employer_confirmed: Some(false),
            }),
            ..WorkStatusSnapshot::default()
        });
        let resolver = PostAuthResolver::new(FakeSource::ok(snapshot), Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        let decision = resolver.run(&user(Role::Employer, None, None)).await;
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert_eq!(decision.destination().name(), "rating");
    }
}
