use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use devora_lib::bootstrap::{
    default_config_path, init_tracing_subscriber, load_config, resolve_data_dir,
    wire_dependencies, PreviewRuntime,
};
use dv_core::geometry::{Point, Size};
use dv_core::{CardId, ProjectId};

#[derive(Parser)]
#[command(name = "devora", about = "File-preview cards, headless", version)]
struct Cli {
    /// Config file. Defaults to `<config dir>/devora/config.toml`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project the card commands act on.
    #[arg(short, long, default_value = "default")]
    project: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the card-face preview of a file.
    Preview { path: String },
    /// Print lines `start..=end` of a file through a windowed view.
    Lines {
        path: String,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long, default_value_t = 99)]
        end: usize,
    },
    /// Drop a file onto the canvas at a native window position.
    Drop {
        path: String,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },
    /// Add a file card at its default position.
    Add { path: String },
    /// List the project's cards, lowest first.
    Cards,
    /// Bring a card to the front.
    Front { card_id: String },
    /// Delete a card.
    Delete { card_id: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        error!(error = %err, "Command failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .or_else(default_config_path)
        .context("Unable to determine config path")?;
    let config = load_config(&config_path)?;
    let data_dir = resolve_data_dir(&config)?;
    init_tracing_subscriber(&data_dir)?;
    info!(config = %config_path.display(), data_dir = %data_dir.display(), "Devora starting");

    let runtime = PreviewRuntime::new(wire_dependencies(&config)?);
    let project = ProjectId::from(cli.project);

    match cli.command {
        Commands::Preview { path } => {
            print_json(&runtime.quick_preview().execute(&path).await)?;
        }
        Commands::Lines { path, start, end } => {
            let viewer = runtime.viewer();
            let (view, state) = viewer.open(&CardId::new(), &path).await;
            let Some(total) = state.total_lines() else {
                print_json(&state)?;
                return Ok(());
            };
            view.range_changed(start, end).await;
            if total > 0 {
                for index in start..=end.min(total - 1) {
                    println!("{:>6}  {}", index + 1, view.get(index));
                }
            }
            viewer.close_all();
        }
        Commands::Drop {
            path,
            x,
            y,
            zoom,
            width,
            height,
        } => {
            let mut reconciler = runtime.drop_reconciler(project);
            let at = Point::new(x, y);
            reconciler.page_drag_enter(true).await;
            reconciler.native_over(at, zoom).await;
            let outcomes = reconciler
                .native_drop(vec![path], Some(at), zoom, Size::new(width, height))
                .await;
            print_json(&outcomes)?;
        }
        Commands::Add { path } => {
            print_json(&runtime.add_file_card().execute(&project, &path, None).await?)?;
        }
        Commands::Cards => {
            print_json(&runtime.list_cards().execute(&project).await?)?;
        }
        Commands::Front { card_id } => {
            let card = runtime
                .bring_card_to_front()
                .execute(&project, &CardId::from(card_id))
                .await?;
            print_json(&card)?;
        }
        Commands::Delete { card_id } => {
            let deleted = runtime
                .delete_card()
                .execute(&CardId::from(card_id))
                .await?;
            println!("{}", if deleted { "deleted" } else { "not found" });
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}
