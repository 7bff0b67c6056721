use clap::{Arg, Command};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use link_preview::{FetcherConfig, LoadOutcome, MetadataFetcher, PreviewSession, PreviewState};
use std::error::Error;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("preview_cli")
        .about("Fetches link preview metadata for one or more URLs")
        .arg(
            Arg::new("url")
                .required(true)
                .num_args(1..)
                .help("URLs to preview"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .help("Metadata service endpoint (defaults to LINK_PREVIEW_ENDPOINT or the public service)"),
        )
        .get_matches();

    #[cfg(feature = "logging")]
    if let Err(e) = link_preview::setup_logging(link_preview::LogConfig {
        log_level: "warn".into(),
        file_output: false,
        ..Default::default()
    }) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let mut config = FetcherConfig::from_env();
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config.endpoint = endpoint.clone();
    }

    println!("{}", "Link Preview".bold().green());
    println!("{}", "============".green());
    println!("{}: {}\n", "Endpoint".bold(), config.endpoint);

    let session = PreviewSession::new(MetadataFetcher::new_with_config(config)?);

    for url in matches.get_many::<String>("url").into_iter().flatten() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        spinner.set_message(format!("Loading {url}"));
        spinner.enable_steady_tick(Duration::from_millis(80));

        let outcome = session.load(url).await;
        spinner.finish_and_clear();

        match outcome {
            LoadOutcome::Applied(PreviewState::Ready(preview)) => {
                println!("{}", preview.title.bold().blue());
                println!("{}", "---------------".blue());
                println!("{}: {}", "URL".bold(), url);
                println!("{}: {}", "Link".bold(), preview.canonical_url);
                println!("{}: {}", "Description".bold(), preview.description);
                if preview.has_image() {
                    println!("{}: {}", "Image".bold(), preview.image);
                }
                println!("{}: {}", "Theme".bold(), preview.theme_color);
                println!();
            }
            LoadOutcome::Applied(PreviewState::Failed { error, .. }) => {
                #[cfg(feature = "logging")]
                link_preview::log_error_card(url, &error);
                eprintln!("{}: {} - {}", "No preview".bold().red(), url, error);
            }
            LoadOutcome::Applied(_) | LoadOutcome::Superseded => {}
        }
    }

    Ok(())
}
