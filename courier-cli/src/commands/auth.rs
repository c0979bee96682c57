//! Account commands: register, login, logout.

use console::style;
use dialoguer::{Input, Password};

use courier_core::config::ConfigHandle;
use courier_core::error::CourierResult;
use courier_services::{EventBus, SessionService};

/// Run the interactive registration flow: request an activation code,
/// verify it, then create the account.
pub async fn register(config: ConfigHandle, name: String, email: String) -> CourierResult<()> {
    let db = super::init_database(&config).await?;
    let api = super::create_api_client(&config).await?;
    let sessions = SessionService::new(db, EventBus::new(16));

    println!(
        "  {} Requesting activation code for {email}...",
        style("...").dim()
    );
    sessions.request_activation_code(&api, &email).await?;
    println!(
        "  {} Code sent. Check the {email} inbox.",
        style("OK").green().bold()
    );

    let code: String = Input::new()
        .with_prompt("Activation code")
        .interact_text()
        .map_err(|e| courier_core::error::CourierError::Internal(e.to_string()))?;

    sessions.activate_email(&api, &email, code.trim()).await?;
    println!("  {} Code verified.", style("OK").green().bold());

    let password = Password::new()
        .with_prompt("Choose a password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| courier_core::error::CourierError::Internal(e.to_string()))?;

    let user = sessions
        .register(&api, &name, &email, &password, code.trim())
        .await?;
    println!(
        "  {} Registered {} ({}). Log in with `courier login -e {}`.",
        style("OK").green().bold(),
        user.name,
        user.id,
        user.email
    );

    Ok(())
}

/// Log in and persist the session as current.
pub async fn login(
    config: ConfigHandle,
    email: String,
    password: Option<String>,
) -> CourierResult<()> {
    let db = super::init_database(&config).await?;
    let api = super::create_api_client(&config).await?;
    let sessions = SessionService::new(db, EventBus::new(16));

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| courier_core::error::CourierError::Internal(e.to_string()))?,
    };

    let session = sessions.login(&api, &email, &password).await?;
    println!(
        "  {} Logged in as {}.",
        style("OK").green().bold(),
        session.user_id
    );

    Ok(())
}

/// Log out and drop the current session.
pub async fn logout(config: ConfigHandle) -> CourierResult<()> {
    let db = super::init_database(&config).await?;
    let api = super::create_api_client(&config).await?;
    let sessions = SessionService::new(db, EventBus::new(16));

    if !sessions.is_logged_in()? {
        println!("Not logged in.");
        return Ok(());
    }

    // Best-effort token install so the backend can invalidate the session
    let _ = sessions.restore(&api).await;
    sessions.logout(&api).await?;
    println!("  {} Logged out.", style("OK").green().bold());

    Ok(())
}
