//! Search command handler
//!
//! Runs one forward-geocoding query and prints the ranked results.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::gate::SearchTrigger;
use crate::geo::{get_searcher, LngLat, LocationSearch, SearchRequest, SearchResult};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place to look for
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Bias results toward this point ("lng,lat"); defaults to map.center
    #[arg(long, short = 'c', allow_hyphen_values = true)]
    pub near: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Comma-separated feature types
    #[arg(long, short = 't')]
    pub types: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse a `--near` value
pub(crate) fn parse_near(near: Option<&str>, config: &Config) -> Result<LngLat> {
    match near {
        Some(s) => LngLat::parse(s).ok_or_else(|| Error::InvalidCoordinates(s.to_string())),
        None => Ok(config.initial_center()),
    }
}

/// Print one result line plus its details
pub(crate) fn print_result(index: usize, result: &SearchResult) {
    println!("{:>2}. {}", index + 1, result.label());
    println!(
        "    {:.5}, {:.5}{}",
        result.coordinates.lng,
        result.coordinates.lat,
        result
            .feature_type
            .as_deref()
            .map(|t| format!("  [{}]", t))
            .unwrap_or_default()
    );
    if let Some(bbox) = result.bbox {
        println!(
            "    bbox: {:.4},{:.4} .. {:.4},{:.4}",
            bbox.min_lng, bbox.min_lat, bbox.max_lng, bbox.max_lat
        );
    }
}

/// Explain a missing token and exit
pub(crate) fn credential_hint() -> ! {
    eprintln!("Error: No Mapbox access token configured");
    eprintln!("Set MAPBOX_TOKEN or run: pinpoint config mapbox.access_token <token>");
    std::process::exit(1);
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let gate = config.search_gate()?;
    let input = args.query.join(" ");

    let Some(query) = gate.admit(&input, SearchTrigger::Submit) else {
        eprintln!(
            "Error: Query must be at least {} characters",
            gate.min_chars()
        );
        std::process::exit(1);
    };

    let proximity = parse_near(args.near.as_deref(), &config)?;
    let request = SearchRequest::new(query, proximity)
        .with_limit(args.limit.unwrap_or(config.mapbox.limit))
        .with_types(args.types.unwrap_or_else(|| config.mapbox.types.clone()));

    let searcher = get_searcher(&config);
    let results = match searcher.search(&request).await {
        Ok(results) => results,
        Err(e) if e.is_config() => credential_hint(),
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        print_result(i, result);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_near() {
        let config = Config::default();
        assert_eq!(parse_near(Some("2.35,48.85"), &config).unwrap(), LngLat::new(2.35, 48.85));
        assert_eq!(parse_near(None, &config).unwrap(), LngLat::new(0.0, 0.0));
        assert!(matches!(
            parse_near(Some("north"), &config),
            Err(Error::InvalidCoordinates(_))
        ));
    }
}
