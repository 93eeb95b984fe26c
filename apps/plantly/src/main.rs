use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings, validate_image, IdentifyController, IdentifyStatus, PredictClient,
    SelectedImage,
};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "plantly", about = "Identify plants from photos")]
struct Cli {
    /// Prediction endpoint; overrides plantly.toml and PLANTLY_ENDPOINT.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an image and print what plant it shows.
    Identify {
        path: PathBuf,
        /// Print the raw result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check whether an image would be accepted for upload.
    Check { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings()?;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = endpoint;
    }

    match cli.command {
        Command::Identify { path, json } => {
            let client = PredictClient::new(&settings.endpoint)?;
            let mut controller = IdentifyController::from_settings(&settings);

            let image = SelectedImage::from_path(&path).await?;
            if controller.select_file(image) {
                controller.identify(&client).await;
            }

            match controller.status() {
                IdentifyStatus::Succeeded(result) if json => {
                    println!("{}", serde_json::to_string_pretty(result)?);
                }
                IdentifyStatus::Succeeded(result) => print!("{}", render::render_result(result)),
                IdentifyStatus::Failed(message) => {
                    eprintln!("{message}");
                    return Ok(ExitCode::FAILURE);
                }
                IdentifyStatus::Idle | IdentifyStatus::Loading => {
                    eprintln!("identification did not complete");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Check { path } => {
            let image = SelectedImage::from_path(&path).await?;
            match validate_image(image.size_bytes(), &image.mime_type, &settings.upload_policy()) {
                Ok(()) => println!(
                    "{} ({}, {} bytes) is ready for identification",
                    image.file_name,
                    image.mime_type,
                    image.size_bytes()
                ),
                Err(err) => {
                    eprintln!("{err}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
