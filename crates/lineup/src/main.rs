mod console;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use console::{ConsoleProgress, OUTPUT, RULE};
use lineup_cdp::{ChromiumBackend, LaunchOptions};
use lineup_engine::backend::Backend;
use lineup_engine::batch::BatchRunner;
use lineup_engine::catalog::{CatalogClient, PlaylistSummary};
use lineup_engine::config::schema::ms;
use lineup_engine::config::{ConfigLoader, LineupConfig};
use lineup_engine::executor::ActionExecutor;
use lineup_engine::gate::{self, Gate};
use lineup_engine::model::{PlaylistEntry, PlaylistTarget, TrackRequest};
use lineup_engine::playlist::{PlaylistError, load_playlist, save_playlist};
use lineup_engine::report::{BatchSummary, write_failure_report};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lineup",
    version,
    about = "Build a festival playlist and add it to a web player"
)]
struct Args {
    /// Config file (defaults to ./lineup.yaml, then ~/.lineup/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch each lineup artist's top tracks and save them as a playlist file
    Build {
        /// Where to write the playlist (defaults to files.playlist)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Add every track of a playlist file to a playlist in the web player
    Import {
        /// Target playlist (defaults to playlist.name)
        #[arg(long)]
        playlist_name: Option<String>,
        /// Playlist file to read (defaults to files.playlist)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ConfigLoader::load_default().await?,
    };

    match args.command {
        Command::Build { output } => {
            let output = output.unwrap_or_else(|| config.files.playlist.clone());
            build(&config, output).await
        }
        Command::Import {
            playlist_name,
            input,
        } => {
            let target = PlaylistTarget::new(
                playlist_name.unwrap_or_else(|| config.playlist.name.clone()),
            );
            let input = input.unwrap_or_else(|| config.files.playlist.clone());
            import(&config, target, input).await
        }
    }
}

async fn build(config: &LineupConfig, output: PathBuf) -> anyhow::Result<()> {
    let artists: usize = config.catalog.lineup.values().map(Vec::len).sum();
    if artists == 0 {
        bail!("No artists configured; add a catalog.lineup section to the config file");
    }

    println!("Fetching top tracks for {} artists...", artists);
    let client = CatalogClient::new(&config.catalog.api_base);
    let entries = client.build_playlist(&config.catalog).await?;

    save_playlist(&output, &entries).await?;

    println!("\n{}", RULE);
    println!("Saved playlist to {}", output.display());
    println!("{}", RULE);
    println!("{}", PlaylistSummary::from_entries(&entries));
    Ok(())
}

async fn import(
    config: &LineupConfig,
    target: PlaylistTarget,
    input: PathBuf,
) -> anyhow::Result<()> {
    let entries = match load_playlist(&input).await {
        Ok(entries) => entries,
        Err(PlaylistError::Missing(path)) => {
            bail!("{} not found. Run `lineup build` first.", path.display())
        }
        Err(e) => return Err(e.into()),
    };
    let requests: Vec<TrackRequest> = entries.iter().map(PlaylistEntry::to_request).collect();
    println!("Loaded {} tracks from {}", requests.len(), input.display());

    let mut backend = ChromiumBackend::new(LaunchOptions::from_config(&config.player));
    backend.launch().await.context("Failed to launch browser")?;

    let mut stdin = BufReader::new(tokio::io::stdin());
    let result = run_session(&mut backend, &mut stdin, config, &requests, &target).await;

    if let Err(e) = backend.close().await {
        warn!("Failed to close browser: {}", e);
    }
    result
}

/// Everything between launching and closing the browser.
async fn run_session<R: AsyncBufRead + Unpin>(
    backend: &mut dyn Backend,
    stdin: &mut R,
    config: &LineupConfig,
    requests: &[TrackRequest],
    target: &PlaylistTarget,
) -> anyhow::Result<()> {
    backend
        .navigate(&config.player.base_url)
        .await
        .context("Failed to open the web player")?;

    if gate::acknowledge(stdin, &gate::login_prompt(), OUTPUT, true).await? == Gate::Aborted {
        return Ok(());
    }
    let creation = gate::playlist_creation_prompt(&target.name);
    if gate::acknowledge(stdin, &creation, OUTPUT, true).await? == Gate::Aborted {
        return Ok(());
    }

    println!("\nAdding {} tracks to '{}'...", requests.len(), target.name);

    let executor = ActionExecutor::new(config);
    let runner = BatchRunner::new(&executor, ms(config.timings.between_items));
    let mut progress = ConsoleProgress;

    let result = tokio::select! {
        result = runner.run(backend, requests, target, &mut progress) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nInterrupted.");
            return Ok(());
        }
    };

    println!("\n{}", RULE);
    println!("IMPORT COMPLETE");
    println!("{}", RULE);
    println!("{}", BatchSummary(&result));

    let report = &config.files.failure_report;
    if write_failure_report(report, &result.failures).await? {
        println!("\nFailed tracks saved to {}", report.display());
    }

    gate::acknowledge(stdin, &gate::close_prompt(), OUTPUT, true).await?;
    Ok(())
}
