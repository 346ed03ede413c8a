use rgp_client::logging::{init_logging, LoggerConfig};
use rgp_client::{log_error, log_info, log_warn, utils};
use rgp_client::{Client, Config, Result};
use std::path::Path;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        log_error!(&err => "[main] Aborting");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::from_file(&config_path)?;
    init_logging(LoggerConfig::from_config(&config.logging)?)?;

    log_info!("[main] Loaded configuration from {}", config_path);
    let client = Client::from_config(&config)?;

    if !client.test().await? {
        log_warn!("[main] {} did not answer the liveness check", client.base_url());
    }

    log_info!("[main] Fetching {}{}", client.base_url(), config.start_path);
    let first = client
        .get(&config.start_path, None)
        .await?
        .into_canonical()?;

    let output_dir = Path::new(&config.output_dir);
    let file_name = utils::page_file_name(&config.start_path, 1);
    utils::save_json(&first, output_dir.join(file_name))?;

    let page_urls = first.page_urls().to_vec();
    log_info!(
        "[main] Result has {} page(s), fetching up to {}",
        page_urls.len().max(1),
        config.max_pages
    );

    // Page 1 is the result already in hand.
    for (index, url) in page_urls
        .iter()
        .enumerate()
        .skip(1)
        .take(config.max_pages.saturating_sub(1))
    {
        let page_number = index + 1;
        log_info!("[main] Fetching page {} from: {}", page_number, url);

        let page = client.fetch_page(url).await?;
        let file_name = utils::page_file_name(&config.start_path, page_number);
        utils::save_json(&page, output_dir.join(file_name))?;
    }

    log_info!("[main] Done");
    Ok(())
}
