//! Login, registration and logout

use super::value_or_prompt;
use crate::cli::{AlertExt, App, CliError, Entry};
use anyhow::Result;
use doctorstats_core::forms::RegisterForm;
use doctorstats_core::services::LOGIN_FAILED_MESSAGE;
use doctorstats_core::Route;

const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";

pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn run_login(app: &App, credentials: Credentials) -> Result<()> {
    if let Entry::AlreadyAuthenticated(user) = app.enter(Route::Login).await? {
        print_already_logged_in(app, user.as_ref().map(|u| u.email.as_str()));
        return Ok(());
    }

    let email = value_or_prompt(credentials.email, "Email")?;
    let password = value_or_prompt(credentials.password, "Password")?;

    let user = app
        .services
        .auth
        .login(&email, &password)
        .await
        .alert(LOGIN_FAILED_MESSAGE)?;

    if app.print_json(&user)? {
        return Ok(());
    }
    println!("Logged in as {} <{}>", user.name, user.email);
    println!("Next: doctorstats dashboard");
    Ok(())
}

pub struct Registration {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Create the account, then log straight in with the same credentials
pub async fn run_register(app: &App, registration: Registration) -> Result<()> {
    if let Entry::AlreadyAuthenticated(user) = app.enter(Route::Register).await? {
        print_already_logged_in(app, user.as_ref().map(|u| u.email.as_str()));
        return Ok(());
    }

    let form = RegisterForm {
        email: value_or_prompt(registration.email, "Email")?,
        name: value_or_prompt(registration.name, "Full name")?,
        password: value_or_prompt(registration.password.clone(), "Password")?,
        confirm_password: match registration.confirm_password {
            Some(confirm) => confirm,
            // A password given as a flag needs no confirmation prompt
            None if registration.password.is_some() => registration.password.unwrap_or_default(),
            None => value_or_prompt(None, "Confirm password")?,
        },
    };
    form.validate()
        .map_err(|e| CliError::message(e.message))?;

    app.services
        .auth
        .register(&form.email, &form.password, &form.name)
        .await
        .alert(REGISTRATION_FAILED_MESSAGE)?;

    let user = app
        .services
        .auth
        .login(&form.email, &form.password)
        .await
        .alert(REGISTRATION_FAILED_MESSAGE)?;

    if app.print_json(&user)? {
        return Ok(());
    }
    println!("Account created. Logged in as {} <{}>", user.name, user.email);
    println!("Next: doctorstats datasets upload <file.csv>");
    Ok(())
}

pub fn run_logout(app: &App) -> Result<()> {
    let was_authenticated = app.session().store().get().is_some();
    app.services.auth.logout();
    if !app.output.json {
        if was_authenticated {
            println!("Logged out.");
        } else {
            println!("No active session.");
        }
    }
    Ok(())
}

fn print_already_logged_in(app: &App, email: Option<&str>) {
    if app.output.json {
        return;
    }
    match email {
        Some(email) => println!("Already logged in as {}.", email),
        None => println!("Already logged in."),
    }
    println!("Run 'doctorstats logout' to switch accounts.");
}
