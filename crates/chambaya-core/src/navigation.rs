//! Navigation targets and decisions handed to the presentation layer.
//!
//! Routes are symbolic: a stable name plus an ordered parameter list.
//! The front end maps them onto whatever screen router it uses.

use std::fmt;

use chambaya_types::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Rate the counterpart of a finished work.
    ///
    /// `rater` only decides parameter order; ids are passed through as
    /// the server reported them (possibly absent).
    Rating {
        rater: Role,
        employer_id: Option<String>,
        work_id: Option<String>,
        worker_id: Option<String>,
    },
    /// Finish a work that is still in progress.
    WorkCompletion {
        work_id: Option<String>,
        application_id: Option<String>,
        work_title: Option<String>,
    },
    /// Profile completion and terms acceptance.
    Onboarding,
    Home,
    Notifications,
    WorkDetail {
        id: String,
    },
    /// Deep link supplied by the server.
    Link {
        url: String,
    },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Rating { .. } => "rating",
            Route::WorkCompletion { .. } => "work-completion",
            Route::Onboarding => "onboarding",
            Route::Home => "home",
            Route::Notifications => "notifications",
            Route::WorkDetail { .. } => "work-detail",
            Route::Link { .. } => "link",
        }
    }

    /// Parameters in the order the target screen expects; absent ids are skipped.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        fn push(out: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&String>) {
            if let Some(value) = value {
                out.push((key, value.clone()));
            }
        }

        let mut out = Vec::new();
        match self {
            Route::Rating {
                rater,
                employer_id,
                work_id,
                worker_id,
            } => {
                if *rater == Role::Employer {
                    push(&mut out, "workerId", worker_id.as_ref());
                    push(&mut out, "workId", work_id.as_ref());
                    push(&mut out, "employerId", employer_id.as_ref());
                } else {
                    push(&mut out, "employerId", employer_id.as_ref());
                    push(&mut out, "workId", work_id.as_ref());
                    push(&mut out, "workerId", worker_id.as_ref());
                }
            }
            Route::WorkCompletion {
                work_id,
                application_id,
                work_title,
            } => {
                push(&mut out, "workId", work_id.as_ref());
                push(&mut out, "applicationId", application_id.as_ref());
                push(&mut out, "workTitle", work_title.as_ref());
            }
            Route::WorkDetail { id } => out.push(("id", id.clone())),
            Route::Link { url } => out.push(("url", url.clone())),
            Route::Onboarding | Route::Home | Route::Notifications => {}
        }
        out
    }

    /// Value of one parameter, if present.
    pub fn param(&self, key: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        let params = self.params();
        if !params.is_empty() {
            let query: String = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// A dialog shown before navigating; its primary button goes to `primary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub primary_label: String,
    pub primary: Route,
}

/// Outcome of one post-auth resolution: exactly one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Navigate(Route),
    Prompt(Prompt),
}

impl NavigationDecision {
    /// Where the user ends up once any prompt is confirmed.
    pub fn destination(&self) -> &Route {
        match self {
            NavigationDecision::Navigate(route) => route,
            NavigationDecision::Prompt(prompt) => &prompt.primary,
        }
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        match self {
            NavigationDecision::Prompt(prompt) => Some(prompt),
            NavigationDecision::Navigate(_) => None,
        }
    }
}

impl fmt::Display for NavigationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationDecision::Navigate(route) => write!(f, "navigate: {route}"),
            NavigationDecision::Prompt(prompt) => {
                writeln!(f, "{}", prompt.title)?;
                writeln!(f, "{}", prompt.message)?;
                write!(f, "[{}] -> {}", prompt.primary_label, prompt.primary)
            }
        }
    }
}
