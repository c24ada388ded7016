//! Ask command handler
//!
//! Sends one question to the configured assistant backend and prints the
//! structured answer, resolving `navigateTo` when a search token is set.

use crate::assistant::{get_assistant, AiAnswer, GeoAssistant};
use crate::cli::init_logging;
use crate::config::Config;
use crate::error::Result;
use crate::geo::{get_searcher, LocationSearch, SearchRequest};
use clap::Args;

/// Ask command arguments
#[derive(Args)]
pub struct AskArgs {
    /// Question about geography
    #[arg(required = true)]
    pub words: Vec<String>,

    /// Print the answer as JSON
    #[arg(long)]
    pub json: bool,

    /// Don't geocode the suggested place
    #[arg(long)]
    pub no_resolve: bool,
}

impl AskArgs {
    pub fn prompt(&self) -> String {
        self.words.join(" ")
    }
}

fn print_answer(answer: &AiAnswer) {
    println!("{}", answer.reply);

    if !answer.topics.is_empty() {
        println!();
        println!("Topics: {}", answer.topics.join(", "));
    }
    if !answer.suggested_follow_ups.is_empty() {
        println!();
        println!("You could also ask:");
        for follow_up in &answer.suggested_follow_ups {
            println!("  - {}", follow_up);
        }
    }
    if let Some(citations) = answer.citations.as_ref().filter(|c| !c.is_empty()) {
        println!();
        println!("Sources:");
        for citation in citations {
            println!("  {} <{}>", citation.title, citation.url);
        }
    }
}

/// Run the ask command
pub async fn run(args: AskArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let assistant = get_assistant(&config);
    let answer = assistant.ask(&args.prompt()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    print_answer(&answer);

    let Some(place) = answer.navigate_to.as_deref() else {
        return Ok(());
    };
    println!();

    if args.no_resolve || !config.search_configured() {
        println!("Place: {}", place);
        return Ok(());
    }

    let request = SearchRequest::new(place, config.initial_center())
        .with_limit(1)
        .with_types(config.mapbox.types.clone());
    match get_searcher(&config).search(&request).await {
        Ok(results) => match results.first() {
            Some(hit) => println!("Place: {} ({})", hit.label(), hit.coordinates),
            None => println!("Place: {} (not found)", place),
        },
        Err(e) => {
            tracing::debug!("Could not resolve {:?}: {}", place, e);
            println!("Place: {}", place);
        }
    }

    Ok(())
}
