use anyhow::Result;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadmgr::cli::{
    run_calls, run_config, run_dashboard, run_follow_ups, run_leads, run_menu, run_users, Cli,
    Commands, Session,
};
use leadmgr::config::AppConfig;
use leadmgr::scope::Scope;
use leadmgr::{Crm, Database};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let db = Database::open()?;

    // `config` must work even when a stored value no longer parses
    if let Some(Commands::Config(command)) = cli.command {
        let effective = match AppConfig::load(&db) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "stored configuration is invalid; showing defaults");
                AppConfig::default()
            }
        };
        return run_config(&db, command, &effective);
    }

    let config = AppConfig::load(&db)?.with_overrides(cli.mode, cli.api_url.as_deref())?;
    debug!(mode = %config.mode, api = %config.api_base(), "configuration resolved");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let root = Scope::new();
    let token = root.token();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!(error = %e, "could not install Ctrl+C handler");
    }

    let crm = Crm::from_config(&config)?;
    let session = Session::new(crm, runtime, root);

    // Failures stay on the store and show up in the views that need it
    if let Err(e) = session.view().run(session.crm.load()) {
        debug!(error = %e, "initial load failed");
    }

    match cli.command {
        None => run_menu(&session, &db, &config),
        Some(Commands::Dashboard) => run_dashboard(&session),
        Some(Commands::Leads(command)) => run_leads(&session, command),
        Some(Commands::Users(command)) => run_users(&session, command),
        Some(Commands::FollowUps(command)) => run_follow_ups(&session, command),
        Some(Commands::Calls(command)) => run_calls(&session, command),
        Some(Commands::Config(_)) => Ok(()),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
/// Logs go to stderr so they never mix with list output.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "leadmgr=debug" } else { "leadmgr=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
