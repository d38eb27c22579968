use clap::Parser;
use nationalize_cli::core::ConfigProvider;
use nationalize_cli::utils::error::NationalizeError;
use nationalize_cli::utils::{logger, validation::Validate};
use nationalize_cli::{CliConfig, HttpPredictionSource, Session, SubmissionHandler, TerminalView};
use std::sync::Arc;
use tokio::io::BufReader;

/// Reports a startup failure and exits with a code chosen by its severity.
fn exit_on_startup_error(stage: &str, e: &NationalizeError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            logger::init_cli_logger(config.verbose, config.json_logs);
            exit_on_startup_error("Loading configuration", &e);
        }
    };

    logger::init_cli_logger(config.verbose, settings.json_logs());

    tracing::info!("Starting nationalize CLI");
    if config.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    if let Err(e) = settings.validate() {
        exit_on_startup_error("Configuration validation", &e);
    }

    let source = match HttpPredictionSource::new(&settings) {
        Ok(source) => source,
        Err(e) => exit_on_startup_error("Building the HTTP client", &e),
    };
    tracing::debug!("Names endpoint: {}", source.endpoint());
    let handler = SubmissionHandler::new(source, TerminalView::new(std::io::stdout()));

    if config.names.is_empty() {
        println!("Enter a name per line (Ctrl-D to quit).");
        let session = Session::new(Arc::new(handler), settings.supersede_in_flight());
        let summary = session.run(BufReader::new(tokio::io::stdin())).await?;
        tracing::info!(
            "{} submissions: {} rendered, {} not found, {} rejected, {} failed, {} superseded",
            summary.submitted,
            summary.rendered,
            summary.not_found,
            summary.rejected,
            summary.failed,
            summary.superseded
        );
        return Ok(());
    }

    // one-shot mode reports the worst cycle through the exit code
    let mut exit_code = 0;
    for name in &config.names {
        let outcome = handler.handle(name).await;
        exit_code = exit_code.max(outcome.exit_code());
    }
    tracing::info!("{} names looked up", config.names.len());

    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

