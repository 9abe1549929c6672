use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::app::App;

fn read_password(given: Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(app: &App, username: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let report = app.coordinator.login(username, &password).await?;
    if let Ok(count) = report.decisions {
        println!("{} decision(s) on record", count);
    }
    Ok(())
}

pub async fn register(
    app: &App,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let password = read_password(password)?;
    app.coordinator.register(username, email, &password).await?;
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    // No need to fetch anything just to throw it away.
    app.coordinator.session().restore().await?;
    app.coordinator.logout().await?;
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    app.signed_in().await?;
    let session = app.coordinator.session();

    match session.profile().await {
        Some(profile) => {
            println!("{} {}", "user:".dimmed(), profile.username.bold());
            if !profile.email.is_empty() {
                println!("{} {}", "email:".dimmed(), profile.email);
            }
        }
        None => println!("{}", "Signed in (profile unavailable)".yellow()),
    }
    println!("{} {}", "server:".dimmed(), app.config.normalized_base_url());
    Ok(())
}

pub async fn update_profile(app: &App, username: &str, email: &str) -> Result<()> {
    app.signed_in().await?;
    app.coordinator
        .session()
        .update_profile(username, email)
        .await?;
    Ok(())
}
