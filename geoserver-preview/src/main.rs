// ABOUTME: Main entry point for the gspreview binary
// ABOUTME: Resolves config and credentials, then runs the preview, snapshot, or detect command

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dialoguer::Password;
use geoserver_preview::cli::{Cli, Commands, LayerArgs};
use geoserver_preview::cli_output::CliOutput;
use geoserver_preview::config::Config;
use geoserver_preview::constants::event_loop::SPINNER_TICK;
use geoserver_preview::constants::viewport::DEFAULT_ZOOM;
use geoserver_preview::image_protocols::detection::resolve_protocol;
use geoserver_preview::image_protocols::{FrameRenderer, SystemEnv};
use geoserver_preview::preview::{MapPreview, PreviewOptions, runtime, snapshot};
use geoserver_sdk::constants::timeouts::HTTP_REQUEST_TIMEOUT;
use geoserver_sdk::{GeoServerClient, GeoServerError};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use std::env;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

/// Used when `snapshot` runs without a terminal and no explicit size
const FALLBACK_TERMINAL_SIZE: (u16, u16) = (80, 24);

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Determine if color should be used
    let use_color = !cli.no_color
        && env::var("NO_COLOR").is_err()
        && env::var("TERM").unwrap_or_default() != "dumb";
    let output = CliOutput::with_color(use_color && std::io::stderr().is_terminal());

    if let Err(e) = run(cli, use_color, &output).await {
        let help = e
            .downcast_ref::<GeoServerError>()
            .and_then(|err| err.help_text());
        output.error(&format!("{:#}", e), help);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, use_color: bool, output: &CliOutput) -> Result<()> {
    let mut config = load_config(&cli)?;
    init_logging(cli.verbose, config.log_file.as_deref())?;

    let detection = resolve_protocol(cli.protocol, config.protocol, &SystemEnv);
    if let Some(warning) = &detection.warning {
        output.warning(warning);
    }
    log::debug!(
        "Rendering with {} ({})",
        detection.protocol,
        detection.reason
    );

    match cli.command {
        Commands::Detect => {
            CliOutput::with_color(use_color).detection(&detection);
            Ok(())
        }
        Commands::Preview { layer, no_metadata } => {
            let client = connect(&mut config)?;
            let options = preview_options(&config, layer, !no_metadata)?;
            let (cols, rows) = crossterm::terminal::size().context("Failed to read terminal size")?;

            let mut preview =
                MapPreview::new(options, FrameRenderer::new(detection.protocol), cols, rows);
            let qualified = preview.qualified_layer();
            preview.set_on_close(move || log::info!("Closed preview of {}", qualified));

            runtime::run(client, preview, use_color).await
        }
        Commands::Snapshot { layer, cols, rows } => {
            let client = connect(&mut config)?;
            let load_metadata = layer.bbox.is_none() || layer.style.is_empty();
            let options = preview_options(&config, layer, load_metadata)?;

            let (term_cols, term_rows) =
                crossterm::terminal::size().unwrap_or(FALLBACK_TERMINAL_SIZE);
            let preview = MapPreview::new(
                options,
                FrameRenderer::new(detection.protocol),
                cols.unwrap_or(term_cols),
                rows.unwrap_or(term_rows),
            );

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .context("Invalid spinner template")?,
            );
            spinner.set_message(format!("Fetching {}", preview.qualified_layer()));
            spinner.enable_steady_tick(SPINNER_TICK);

            let result = snapshot::snapshot(&client, preview).await;
            spinner.finish_and_clear();

            println!("{}", result?);
            Ok(())
        }
    }
}

/// Config files, then environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let files = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    let flags = Config {
        url: cli.url.clone(),
        username: cli.user.clone(),
        protocol: cli.protocol,
        log_file: cli.log_file.clone(),
        ..Default::default()
    };

    let config = files.merge(Config::from_env()).merge(flags);
    config.validate()?;
    Ok(config)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_filter = if verbose {
        "debug"
    } else if log_file.is_some() {
        "info"
    } else {
        "off"
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Build an authenticated client, prompting for the password when none is configured.
fn connect(config: &mut Config) -> Result<GeoServerClient> {
    let url = config.url.clone().ok_or_else(|| {
        anyhow!("No GeoServer URL configured. Pass --url, set GEOSERVER_URL, or add url to gspreview.toml")
    })?;
    let username = config.username.clone().ok_or_else(|| {
        anyhow!("No GeoServer username configured. Pass --user, set GEOSERVER_USER, or add username to gspreview.toml")
    })?;

    let password = match config.password.take() {
        Some(password) => password,
        None => prompt_password(&username, &url)?,
    };

    let proxy = config
        .proxy
        .as_deref()
        .map(GeoServerClient::create_proxy)
        .transpose()?;
    let timeout = config
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(HTTP_REQUEST_TIMEOUT);

    Ok(GeoServerClient::builder()
        .base_url(url)
        .username(username)
        .password(password)
        .timeout(timeout)
        .proxy(proxy)
        .build()?)
}

fn prompt_password(username: &str, url: &str) -> Result<SecretString> {
    if !std::io::stdin().is_terminal() {
        return Err(anyhow!(
            "No GeoServer password configured. Set GEOSERVER_PASSWORD or add password to gspreview.toml"
        ));
    }

    let password = Password::new()
        .with_prompt(format!("Password for {} at {}", username, url))
        .interact()
        .context("Failed to read password")?;
    Ok(SecretString::new(password.into_boxed_str()))
}

fn preview_options(config: &Config, layer: LayerArgs, load_metadata: bool) -> Result<PreviewOptions> {
    let workspace = layer
        .workspace
        .or_else(|| config.default_workspace.clone())
        .ok_or_else(|| {
            anyhow!("No workspace given. Pass --workspace or set default_workspace in gspreview.toml")
        })?;

    Ok(PreviewOptions {
        workspace,
        layer: layer.layer,
        zoom: layer.zoom.or(config.default_zoom).unwrap_or(DEFAULT_ZOOM),
        bounds: layer.bbox,
        styles: layer.style,
        load_metadata,
    })
}
