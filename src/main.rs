//! # arxiv_alert
//!
//! Emails a digest of the newest arXiv papers that match a configured set of
//! categories, keywords, and authors.
//!
//! ## Usage
//!
//! ```sh
//! arxiv_alert --config_path config-demo.yaml
//! ```
//!
//! ## Architecture
//!
//! One run is a single linear pass:
//! 1. **Config**: Load and validate the YAML file (exit 1 on failure)
//! 2. **Query**: Build the boolean `search_query` URL
//! 3. **Fetch**: GET the Atom feed from the arXiv API
//! 4. **Parse**: Turn feed entries into papers
//! 5. **Render**: Build the HTML digest
//! 6. **Deliver**: Send one multipart email; failures are logged, not fatal
//!
//! Fetch and parse failures abort the run before anything is sent.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod feed;
mod mailer;
mod models;
mod outputs;
mod query;
mod utils;

use api::ArxivClient;
use cli::Cli;
use config::AlertConfig;
use mailer::DeliveryOutcome;
use outputs::html;
use query::SearchQuery;

/// Why a run stopped before finishing. Every variant maps to exit status 1.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Feed(#[from] error::AlertError),
}

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("arxiv_alert starting up");

    let args = Cli::parse();
    debug!(config_path = %args.config_path.display(), dry_run = args.dry_run, "Parsed CLI arguments");

    let status = match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Config(e)) => {
            error!(error = %e, "Failed to load configuration");
            ExitCode::FAILURE
        }
        Err(RunError::Feed(e)) => {
            error!(error = %e, "Failed to build digest; nothing was sent");
            ExitCode::FAILURE
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    status
}

/// One alert run: load config, fetch, parse, render, deliver.
///
/// Configuration failures return before any network activity. A failed
/// delivery is logged by the mailer and still counts as success.
async fn run(args: &Cli) -> Result<(), RunError> {
    // ---- Configuration ----
    let config = AlertConfig::load(&args.config_path, args.sender_password.clone())?;

    // ---- Query & fetch ----
    let url = SearchQuery::from_filters(&config.search).to_url(&config.api_url);
    info!(%url, "Querying arXiv");

    let client = ArxivClient::new()?;
    let body = client.fetch_feed(&url).await?;

    // ---- Parse & render ----
    let papers = feed::parse_feed(&body)?;
    if papers.is_empty() {
        warn!("No papers matched; sending an empty digest");
    }
    let digest = html::render_digest(&papers);

    // ---- Delivery ----
    if args.dry_run {
        info!("Dry run: printing digest instead of sending");
        println!("{digest}");
        return Ok(());
    }
    match mailer::send_digest(&digest, &config.mail).await {
        DeliveryOutcome::Sent => {
            info!(receivers = config.mail.receivers.len(), papers = papers.len(), "Digest delivered")
        }
        DeliveryOutcome::Failed(reason) => {
            warn!(%reason, "Digest was not delivered")
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::tests::{EMPTY_FEED, SAMPLE_FEED};
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cli(config_path: &std::path::Path, dry_run: bool) -> Cli {
        Cli {
            config_path: config_path.to_path_buf(),
            sender_password: None,
            dry_run,
        }
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config_yaml(api_url: &str, smtp_port: u16) -> String {
        format!(
            "categories: [cs.LG]\n\
             api_url: {api_url}\n\
             sender: alerts@example.com\n\
             sender_password: secret\n\
             receivers: [you@example.com]\n\
             smtp_host: 127.0.0.1\n\
             smtp_port: {smtp_port}\n"
        )
    }

    #[tokio::test]
    async fn test_run_missing_config_fails_before_network() {
        let args = cli(std::path::Path::new("/nonexistent/arxiv-alert.yaml"), false);
        let err = run(&args).await.unwrap_err();
        assert!(matches!(err, RunError::Config(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_run_missing_sender_fails_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_FEED))
            .expect(0)
            .mount(&server)
            .await;

        let yaml = config_yaml(&format!("{}/api/query", server.uri()), 465)
            .replace("sender: alerts@example.com\n", "");
        let file = write_config(&yaml);
        let err = run(&cli(file.path(), false)).await.unwrap_err();
        assert!(
            matches!(err, RunError::Config(config::ConfigError::MissingField("sender"))),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_run_fetch_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let file = write_config(&config_yaml(&format!("{}/api/query", server.uri()), 465));
        let err = run(&cli(file.path(), true)).await.unwrap_err();
        assert!(matches!(err, RunError::Feed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_run_dry_run_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .expect(1)
            .mount(&server)
            .await;

        let file = write_config(&config_yaml(&format!("{}/api/query", server.uri()), 465));
        run(&cli(file.path(), true)).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_delivery_failure_still_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_FEED))
            .mount(&server)
            .await;

        // Nothing listens on port 1, so the SMTP connection is refused.
        let file = write_config(&config_yaml(&format!("{}/api/query", server.uri()), 1));
        run(&cli(file.path(), false)).await.unwrap();
    }
}
