mod cli;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("send") => cli::handle_send(&args[1..]).await,
        Some("render") => cli::handle_render(&args[1..]),
        Some("help") | Some("-h") | Some("--help") | None => {
            cli::print_help();
            Ok(())
        }
        Some(other) => {
            cli::print_help();
            anyhow::bail!("Unknown command: {other}")
        }
    }
}
