use blocktree::Command;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blocktree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!(
                "usage: blocktree (create FILE BLOCK_SIZE | insert FILE INPUT | \
                 search FILE INPUT OUTPUT | range FILE INPUT OUTPUT | print FILE OUTPUT)"
            );
            std::process::exit(2);
        }
    };

    if let Err(e) = command.run() {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
