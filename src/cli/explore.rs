//! Explore command handler
//!
//! Drives a full coordinator session against the headless recording engine:
//! idle rotation, search, selection and (optionally) an assistant question.
//! Prints where the camera ended up and which region is outlined.

use crate::assistant::{get_assistant, AssistantBackend};
use crate::cli::init_logging;
use crate::cli::search::{credential_hint, print_result};
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::engine::recording::RecordingEngine;
use crate::engine::Camera;
use crate::error::Result;
use crate::geo::get_searcher;
use crate::geo::mapbox::MapboxSearch;
use clap::Args;
use serde_json::json;

type Session = Coordinator<MapboxSearch, AssistantBackend, RecordingEngine>;

/// Explore command arguments
#[derive(Args)]
pub struct ExploreArgs {
    /// Place to search for
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Which result to select (1-based)
    #[arg(long, short = 'i', default_value = "1")]
    pub pick: usize,

    /// Let the globe spin for N steps before searching
    #[arg(long, default_value = "0")]
    pub spin_steps: usize,

    /// Ask the assistant this afterwards and follow its suggestion
    #[arg(long)]
    pub ask: Option<String>,

    /// Override the theme (light or dark)
    #[arg(long)]
    pub theme: Option<String>,

    /// Print the final state as JSON
    #[arg(long)]
    pub json: bool,
}

/// Finish the engine's animation and forward its events
fn settle(session: &mut Session) {
    let events = session
        .engine_mut()
        .map(RecordingEngine::complete_animation)
        .unwrap_or_default();
    session.handle_events(events);
}

fn print_state(session: &Session) {
    let viewport = session.viewport();
    println!(
        "Viewport: {:.5}, {:.5} @ zoom {:.2}",
        viewport.center.lng, viewport.center.lat, viewport.zoom
    );
    match session.overlay() {
        Some(overlay) => {
            println!("Overlay:  {}", overlay.source_id());
            let ring: Vec<String> = overlay
                .ring()
                .iter()
                .map(|p| format!("({:.4},{:.4})", p.lng, p.lat))
                .collect();
            println!("          {}", ring.join(" "));
        }
        None => println!("Overlay:  none"),
    }
    println!("Theme:    {}", session.theme());
}

/// Run the explore command
pub async fn run(args: ExploreArgs) -> Result<()> {
    init_logging("warn");

    let mut config = Config::load()?;
    if let Some(theme) = args.theme {
        config.map.theme = theme;
    }

    let engine = RecordingEngine::new(Camera::new(config.initial_center(), config.map.zoom));
    let mut session = Coordinator::from_config(
        &config,
        get_searcher(&config),
        get_assistant(&config),
        engine,
    )?;

    if session.start() {
        for _ in 0..args.spin_steps {
            settle(&mut session);
        }
    }

    let query = args.query.join(" ");
    let outcome = session.submit_search(&query).await;
    match outcome.error {
        Some(e) if e.is_config() => credential_hint(),
        Some(e) => return Err(e.into()),
        None => {}
    }

    if outcome.results.is_empty() {
        println!("No results for \"{}\"", query.trim());
        return Ok(());
    }

    if !args.json {
        for (i, result) in outcome.results.iter().enumerate() {
            print_result(i, result);
        }
        println!();
    }

    let index = args.pick.saturating_sub(1);
    let Some(selected) = session.select_index(index) else {
        eprintln!(
            "Error: --pick {} is out of range (1..={})",
            args.pick,
            outcome.results.len()
        );
        std::process::exit(1);
    };
    settle(&mut session);

    let mut answer = None;
    if let Some(prompt) = &args.ask {
        let outcome = session.ask(prompt).await?;
        settle(&mut session);
        answer = Some(outcome);
    }

    if args.json {
        let state = json!({
            "selected": selected,
            "viewport": session.viewport(),
            "overlay": session.overlay().map(|o| json!({
                "sourceId": o.source_id(),
                "geojson": o.geojson(),
            })),
            "theme": session.theme(),
            "answer": answer.as_ref().map(|a| &a.answer),
            "navigatedTo": answer.as_ref().and_then(|a| a.navigated_to.as_ref()),
            "history": session.history().turns(),
        });
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!("Selected: {}", selected.label());
    print_state(&session);

    if let Some(outcome) = answer {
        println!();
        println!("{}", outcome.answer.reply);
        if let Some(place) = outcome.navigated_to {
            println!("Flew to:  {}", place.label());
            print_state(&session);
        }
    }

    Ok(())
}
