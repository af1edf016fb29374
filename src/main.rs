use clap::Parser;
use doc_harvest::{FetcherKind, HarvestConfig, Harvester};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    // Defaults, then config file, then environment, then flags
    let mut config = match &args.config {
        Some(path) => match HarvestConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration: {}", e);
                std::process::exit(2);
            }
        },
        None => HarvestConfig::default(),
    };
    config.apply_env();
    args.apply_to(&mut config);

    ::log::info!("Harvesting .{} links from {}", config.normalized_extension(), config.page_url);

    if config.fetcher == FetcherKind::Rendered && !config.cache_file.exists() {
        println!("Note: Rendered fetching requires a WebDriver server (e.g., ChromeDriver).");
        println!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
    }

    let start_time = std::time::Instant::now();
    let summary = match Harvester::new(config).run().await {
        Ok(summary) => summary,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    ::log::info!(
        "Processed {} links in {:.2} seconds",
        summary.links_accepted,
        start_time.elapsed().as_secs_f64()
    );

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => ::log::error!("Failed to serialize summary: {}", e),
        }
    }
}
