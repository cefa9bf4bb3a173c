use std::path::Path;

use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use petal::{
    App, HandlerError, HttpError, Request, Response,
    adapters::middleware::from_settings,
    config::{
        DEFAULT_CONFIG_TEMPLATE, ServerConfig, ServerConfigValidator, loader::load_config,
    },
    tracing_setup,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Start the demo application (default)
    Serve {
        /// Configuration file to use
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Some(Commands::Validate { config }) => validate_config_command(&config).await,
        Some(Commands::Init { config }) => init_config_command(&config).await,
        Some(Commands::Serve { config }) => serve_command(&config).await,
        None => serve_command(&args.config).await,
    }
}

async fn serve_command(config_path: &str) -> Result<()> {
    let (config, loaded_from_file) = if Path::new(config_path).exists() {
        let config = load_config(config_path)
            .await
            .with_context(|| format!("Failed to load config from {config_path}"))?;
        (config, true)
    } else {
        (ServerConfig::default(), false)
    };

    tracing_setup::init_tracing_with_config(&config.logging.level, config.logging.json)
        .map_err(|e| eyre!("Failed to initialize tracing: {}", e))?;

    if loaded_from_file {
        tracing::info!("Loaded configuration from {config_path}");
    } else {
        tracing::warn!("Configuration file {config_path} not found, using defaults");
    }

    ServerConfigValidator::validate(&config).context("Invalid configuration")?;

    let app = demo_app(&config)?;
    tracing::info!(
        "Starting petal demo on {} ({} routes, keep-alive: {})",
        config.listen_addr,
        app.router().len(),
        config.keep_alive
    );
    println!("petal listening on {}", config.listen_addr);

    app.serve(&config).await?;

    tracing::info!("Graceful shutdown completed");
    Ok(())
}

#[derive(Serialize)]
struct User {
    id: i64,
    name: String,
}

fn demo_app(config: &ServerConfig) -> Result<App> {
    let app = App::new()
        .use_middlewares(from_settings(&config.middleware, &config.logging))
        .get("/", |_request: Request| async {
            Ok::<_, HandlerError>(Response::ok("Hello from petal"))
        })?
        .get("/users/{id}", |request: Request| async move {
            let id = request
                .path_params()
                .long("id")
                .ok_or_else(|| HttpError::bad_request("User id must be an integer"))?;
            let user = User {
                id,
                name: format!("user-{id}"),
            };
            Ok::<_, HandlerError>(Response::json(&user)?)
        })?
        .post("/echo", |request: Request| async move {
            let content_type = request
                .header("content-type")
                .unwrap_or("text/plain; charset=utf-8")
                .to_string();
            Ok::<_, HandlerError>(
                Response::ok("")
                    .with_header("Content-Type", content_type)
                    .with_body(request.body().clone()),
            )
        })?
        .get("/search", |request: Request| async move {
            let query = request
                .query()
                .string("q")
                .ok_or_else(|| HttpError::bad_request("Missing query parameter 'q'"))?;
            let limit = request.query().int("limit").unwrap_or(10);
            Ok::<_, HandlerError>(Response::ok(format!("search '{query}' (limit {limit})")))
        })?;
    Ok(app)
}

/// Validate configuration file and exit
async fn validate_config_command(config_path: &str) -> Result<()> {
    println!("🔍 Validating configuration file: {config_path}");

    if !Path::new(config_path).exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    let config = match load_config(config_path).await {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e}");
            std::process::exit(1);
        }
    };

    match ServerConfigValidator::validate(&config) {
        Ok(()) => {
            println!("✅ Configuration validation: OK");
            println!();
            println!("📋 Configuration Summary:");
            println!("   • Listen Address: {}", config.listen_addr);
            println!("   • Keep-Alive: {}", config.keep_alive);
            println!("   • Max Body Bytes: {}", config.max_body_bytes);
            println!("   • Shutdown Timeout: {}", config.shutdown_timeout);
            println!("   • CORS Enabled: {}", config.middleware.cors.is_some());
            println!();
            println!("🎉 Configuration is valid and ready to use!");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("💡 Common fixes:");
            println!("   • Verify listen address format (e.g., '127.0.0.1:3000')");
            println!("   • Use humantime durations for shutdown_timeout (e.g., '30s')");
            println!("   • CORS origins must look like 'https://example.com' without a path");
            std::process::exit(1);
        }
    }
}

/// Initialize a new configuration file
async fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    tokio::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .await
        .context("Failed to write config file")?;
    println!("✅ Created default configuration at: {config_path}");
    println!("   Run 'petal serve --config {config_path}' to start the server");
    Ok(())
}
