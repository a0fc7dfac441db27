//! Delve server entry point
//!
//! - `delve-server` / `delve-server serve` - Start the HTTP server (default)
//! - `delve-server research <query>` - Run one job in-process
//! - `delve-server config` - Show or validate the configuration

use anyhow::Context;
use delve::cli::output::Output;
use delve::cli::research::{print_outcome, run_research, write_outcome};
use delve::cli::{Cli, Commands};
use delve::utils::toml_config::{ConfigManager, DelveConfig};
use delve::{api, AppState};
use owo_colors::OwoColorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Some(Commands::Config { validate }) = &cli.command {
        return show_config(&cli.config, *validate, &out);
    }

    let config_manager = Arc::new(load_config(&cli.config)?);
    let config = config_manager.config();
    init_tracing(&config, cli.verbose);

    match cli.command {
        None | Some(Commands::Serve) => serve(config_manager).await,
        Some(Commands::Research {
            query,
            mode,
            output,
            interval_ms,
        }) => {
            let state = AppState::from_config(Arc::clone(&config_manager))?;
            out.banner();
            let outcome = run_research(
                &state.manager,
                &query,
                &mode,
                Duration::from_millis(interval_ms),
                &out,
            )
            .await?;
            print_outcome(&outcome, &out);

            if let Some(path) = output {
                write_outcome(&outcome, &path)?;
                out.success(&format!("Result written to {}", path.display()));
            }
            Ok(())
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}

/// Load the config file, or run on defaults when it does not exist.
fn load_config(path: &Path) -> anyhow::Result<ConfigManager> {
    if path.exists() {
        return ConfigManager::new(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    let config = DelveConfig::default();
    config
        .validate()
        .with_context(|| format!("{} not found and the defaults are not usable", path.display()))?;
    eprintln!("{} {} not found, using defaults", "Note:".yellow(), path.display());
    Ok(ConfigManager::from_config(config))
}

fn init_tracing(config: &DelveConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("delve={level},tower_http={level}")));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config_manager: Arc<ConfigManager>) -> anyhow::Result<()> {
    let config = config_manager.config();
    let state = AppState::from_config(Arc::clone(&config_manager))?;
    let app = api::routes::create_router(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Delve server listening on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn show_config(path: &Path, validate: bool, out: &Output) -> anyhow::Result<()> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        DelveConfig::parse(&content)?
    } else {
        out.warning(&format!("{} not found, showing defaults", path.display()));
        DelveConfig::default()
    };

    if validate {
        match config.validate() {
            Ok(()) => {
                out.success(&format!("{} is valid", path.display()));
                return Ok(());
            }
            Err(e) => {
                out.error(&e.to_string());
                anyhow::bail!("Configuration is invalid");
            }
        }
    }

    out.header("Server");
    out.kv("address", &config.bind_address());
    out.kv("log_level", &config.server.log_level);
    out.kv("log_format", &config.server.log_format);
    out.kv("cors_origins", &config.server.cors_origins.join(", "));
    out.header("Auth");
    out.kv("api_key_env", &config.auth.api_key_env);
    out.header("LLM");
    out.kv("runner", config.llm.runner.as_str());
    out.kv("api_key_env", &config.llm.api_key_env);
    out.kv("api_base", &config.llm.api_base);
    out.kv("model", &config.llm.model);
    out.kv("temperature", &config.llm.temperature.to_string());
    out.kv("max_tokens", &config.llm.max_tokens.to_string());
    out.kv("timeout_secs", &config.llm.timeout_secs.to_string());
    out.header("Research");
    out.kv("max_input_chars", &config.research.max_input_chars.to_string());
    out.kv(
        "max_concurrent_searches",
        &config.research.max_concurrent_searches.to_string(),
    );
    out.kv("event_capacity", &config.research.event_capacity.to_string());
    Ok(())
}
