//! Session command handlers.

use anyhow::Result;
use chambaya_core::flow::{self, LoginMethod, LoginOutcome};

use super::App;

pub async fn login_password(app: &App, email: String, password: String) -> Result<()> {
    let method = LoginMethod::Password { email, password };
    login(app, &method).await
}

pub async fn login_google(app: &App, id: String) -> Result<()> {
    login(app, &LoginMethod::Google { id }).await
}

async fn login(app: &App, method: &LoginMethod) -> Result<()> {
    let delay = app.config.resolver.work_status_delay();
    let outcome = flow::login(&app.client, method, delay).await?;
    println!(
        "Logged in as {} <{}>",
        outcome.user.full_name, outcome.user.email
    );
    print_outcome(&outcome);
    Ok(())
}

/// Clears the session. Storage failures are logged, never reported.
pub fn logout(app: &App) {
    let was_logged_in = app.session().snapshot().is_authenticated();
    app.session().clear_auth();
    if was_logged_in {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
}

pub fn whoami(app: &App) {
    match app.require_user() {
        Ok(user) => {
            println!("{} <{}>", user.full_name, user.email);
            println!("id: {}", user.id);
            println!("role: {}", user.role);
            let onboarding = if user.is_onboarded() { "complete" } else { "pending" };
            println!("onboarding: {onboarding}");
        }
        Err(_) => println!("Not logged in."),
    }
}

pub async fn next(app: &App) -> Result<()> {
    let delay = app.config.resolver.work_status_delay();
    let outcome = flow::resume(&app.client, delay).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &LoginOutcome) {
    println!();
    println!("{}", outcome.decision);
}
