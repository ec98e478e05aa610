use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use base64::Engine;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use logo_forge::client::{GenerationSession, LogoApiClient, PollConfig, PollError};
use logo_forge::models::job::JobRequest;

/// Submit a logo generation request and wait for the gallery.
#[derive(Debug, Parser)]
#[command(name = "generate", version)]
struct Args {
    /// Brand description, e.g. "a coffee shop logo, warm colors".
    description: String,

    #[arg(long)]
    style: Option<String>,

    /// Preferred color; repeat for several.
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Reference image sent inline as a data URL; repeat for several.
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    #[arg(long, env = "LOGO_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[arg(long, default_value_t = 3)]
    interval_secs: u64,

    #[arg(long, default_value_t = 40)]
    max_attempts: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let files = match encode_files(&args.files) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Could not read reference file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let request = JobRequest {
        description: Some(args.description),
        style: args.style,
        colors: (!args.colors.is_empty()).then_some(args.colors),
        files: (!files.is_empty()).then_some(files),
    };

    let client = match LogoApiClient::new(&args.api_url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Could not create HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut session = GenerationSession::new(PollConfig {
        interval: Duration::from_secs(args.interval_secs),
        max_attempts: args.max_attempts,
    });

    eprintln!("Generating logo variants...");
    match session.run(&client, &request, &cancel).await {
        Ok(()) => {
            if let Some(gallery) = session.gallery() {
                print!("{gallery}");
            }
            ExitCode::SUCCESS
        }
        Err(PollError::Cancelled) => {
            eprintln!("Cancelled");
            ExitCode::from(130)
        }
        Err(_) => {
            if let Some(note) = session.take_notification() {
                eprintln!("{}: {}", note.title, note.description);
            }
            ExitCode::FAILURE
        }
    }
}

/// Read each file as a `data:<mime>;base64,...` URL.
fn encode_files(paths: &[PathBuf]) -> std::io::Result<Vec<String>> {
    paths.iter().map(|p| data_url(p)).collect()
}

fn data_url(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_uses_extension_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sketch.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let url = data_url(&path).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "generate",
            "a coffee shop logo",
            "--color",
            "#6f4e37",
            "--color",
            "#f5deb3",
            "--max-attempts",
            "30",
            "--interval-secs",
            "2",
        ])
        .unwrap();
        assert_eq!(args.colors.len(), 2);
        assert_eq!(args.max_attempts, 30);
        assert_eq!(args.interval_secs, 2);
        assert!(args.style.is_none());
    }
}
