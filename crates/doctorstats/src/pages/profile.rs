//! Profile page: account details, edits and subscription

use crate::cli::{AlertExt, App};
use crate::components::tables::{format_profile, format_subscription};
use anyhow::Result;
use doctorstats_core::types::UserUpdate;
use doctorstats_core::Route;

pub async fn run_show(app: &App) -> Result<()> {
    app.enter(Route::Profile).await?;
    let user = match app.session().user() {
        Some(user) => user,
        None => app
            .services
            .users
            .me()
            .await
            .alert("Failed to load your profile")?,
    };
    println!("{}", format_profile(&user, app.output.json));
    Ok(())
}

pub async fn run_update(
    app: &App,
    name: Option<String>,
    organization: Option<String>,
) -> Result<()> {
    app.enter(Route::Profile).await?;
    let update = UserUpdate { name, organization };
    let user = app
        .services
        .users
        .update_me(&update)
        .await
        .alert("Failed to update profile")?;

    if app.print_json(&user)? {
        return Ok(());
    }
    println!("Profile updated successfully\n");
    println!("{}", format_profile(&user, false));
    Ok(())
}

pub async fn run_subscription(app: &App) -> Result<()> {
    app.enter(Route::Profile).await?;
    let subscription = app
        .services
        .users
        .subscription()
        .await
        .alert("Failed to load subscription")?;
    println!(
        "{}",
        format_subscription(&subscription, app.output.json, app.output.no_color)
    );
    Ok(())
}
