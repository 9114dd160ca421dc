// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MLS Fixtures command-line client
//!
//! Lists upcoming Major League Soccer games, optionally narrowed by a search
//! term. With `MLS_EMAIL` and `MLS_PASSWORD` set, it also signs in and shows
//! the user's profile and favorites.

use mls_fixtures::{config::Config, time_utils, AppContext};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(league = %config.league_id, "Starting MLS Fixtures");

    let ctx = AppContext::connect(&config).await?;
    let subscription = ctx.start();

    ctx.games.load_upcoming().await?;

    if let Some(term) = std::env::args().nth(1) {
        ctx.games.set_search_term(&term);
    }

    let now = chrono::Local::now().naive_local();
    let games = ctx.games.snapshot();
    println!(
        "{} of {} upcoming games{}",
        games.filtered.len(),
        games.games.len(),
        if games.search_term.is_empty() {
            String::new()
        } else {
            format!(" matching \"{}\"", games.search_term)
        }
    );
    for game in &games.filtered {
        let when = match game.kickoff() {
            Some(k) if time_utils::is_past(k, now) => {
                format!("{} (started)", time_utils::format_kickoff(k, false))
            }
            Some(k) => format!(
                "{} ({})",
                time_utils::format_kickoff(k, false),
                time_utils::relative_label(k, now)
            ),
            None => game.date.clone(),
        };
        println!("  [{}] {}  {}", game.id, game.event, when);
    }

    if let (Ok(email), Ok(password)) = (
        std::env::var("MLS_EMAIL"),
        std::env::var("MLS_PASSWORD"),
    ) {
        let user = ctx.auth.sign_in(&email, &password).await?;

        if let Some(profile) = ctx.profile.fetch(&user.uid).await? {
            let team = if profile.favorite_team.is_empty() {
                "-"
            } else {
                profile.favorite_team.as_str()
            };
            println!(
                "Signed in as {} <{}>, favorite team: {}",
                profile.display_name, profile.email, team
            );
        }

        ctx.games.load_favorites(&user.uid).await?;
        for favorite in ctx.games.snapshot().favorites {
            println!("  * {} on {}", favorite.event, favorite.date);
        }

        ctx.auth.sign_out().await?;
    }

    ctx.shutdown(subscription);
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mls_fixtures=debug,info")),
        )
        .with(format)
        .init();
}
