//! Dormant account cleanup command.

#![forbid(unsafe_code)]

mod cli_args;
mod prompts;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dormant_application::{AccountApi, CleanupService, Clock, SessionKeeper};
use dormant_core::{AppError, AppResult};
use dormant_domain::RunConfiguration;
use dormant_infrastructure::{
    ConsoleCleanupReporter, JsonUserRecordFile, SystemClock, TokioPauser, XmlRpcAccountApi,
    XmlRpcClientConfig,
};

use crate::cli_args::CliArgs;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = CliArgs::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = %error, "cleanup aborted");
            eprintln!("ERROR: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> AppResult<()> {
    let config = RunConfiguration::from_options(&args.run_options());
    let reporter = Arc::new(ConsoleCleanupReporter::stdout());
    reporter.banner(&config);

    let credentials = prompts::credentials(args.username, args.password)?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let mut client_config = XmlRpcClientConfig::parse(&args.api_url)?;
    client_config.echo_responses = args.print_responses;

    let account_api: Arc<dyn AccountApi> =
        Arc::new(XmlRpcAccountApi::new(http_client, client_config));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut sessions = SessionKeeper::new(
        account_api.clone(),
        clock.clone(),
        credentials,
        config.session_renewal_interval,
    );
    let session = sessions.renew().await?;
    reporter.session_opened(&session);

    let path = match args.json_file {
        Some(path) => path,
        None => {
            let directory = env::current_dir().map_err(|error| {
                AppError::Internal(format!("failed to resolve working directory: {error}"))
            })?;
            prompts::json_file(&directory)?
        }
    };
    reporter.input_selected(&path, &config);
    let records = JsonUserRecordFile::new(path).load()?;

    let mut service = CleanupService::new(
        account_api,
        sessions,
        clock,
        Arc::new(TokioPauser),
        reporter,
        config,
    );
    let summary = service.run(&records).await?;

    info!(
        evaluated = summary.evaluated,
        dropped = summary.dropped,
        failed = summary.failed,
        "cleanup finished"
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
