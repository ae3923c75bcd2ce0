//! Plinth CLI - Compose, inspect and export scenes

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{compose, init, inspect, room};
use config::PlinthConfig;
use plinth_import::Fetcher;

#[derive(Parser)]
#[command(name = "plinth")]
#[command(about = "Scene composition and export engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a composition file and export the scene
    Compose {
        /// Path to composition TOML
        scene: String,

        /// Export format (gltf, obj or stl)
        #[arg(long)]
        format: Option<String>,

        /// Output directory
        #[arg(long)]
        out: Option<String>,

        /// Export the room along with the objects
        #[arg(long)]
        include_room: bool,
    },

    /// Load one model and print its parts
    Inspect {
        /// Model path or http(s) URL
        model: String,

        /// Override the format inferred from the extension
        #[arg(long)]
        format: Option<String>,

        /// MTL sidecar for OBJ models
        #[arg(long)]
        material: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate a room shell and export it
    Room {
        length: f32,
        width: f32,
        height: f32,

        /// modern, minimalist or industrial
        #[arg(long, default_value = "modern")]
        style: String,

        /// Export format (gltf, obj or stl)
        #[arg(long)]
        format: Option<String>,

        /// Output directory
        #[arg(long)]
        out: Option<String>,
    },

    /// Write a starter composition file
    Init {
        /// Path of the file to create
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = PlinthConfig::load()?;

    match cli.command {
        Commands::Compose {
            scene,
            format,
            out,
            include_room,
        } => compose::run(
            compose::ComposeArgs {
                scene,
                format,
                out,
                include_room,
            },
            &config,
        ),
        Commands::Inspect {
            model,
            format,
            material,
            json,
        } => inspect::run(
            inspect::InspectArgs {
                model,
                format,
                material,
                json,
            },
            Fetcher::new(config.settings.fetch_timeout),
        ),
        Commands::Room {
            length,
            width,
            height,
            style,
            format,
            out,
        } => room::run(
            room::RoomArgs {
                length,
                width,
                height,
                style,
                format,
                out,
            },
            &config,
        ),
        Commands::Init { path, force } => init::run(&path, force),
    }
}
