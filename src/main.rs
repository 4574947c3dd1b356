use doneday::commands::Cli;
use doneday::libs::messages::macros::is_debug_mode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::DEBUG.into())
            .from_env_lossy();
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    }

    Cli::menu().await
}
