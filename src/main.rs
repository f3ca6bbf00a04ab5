use clap::Parser;
use crystal_chat::app::Application;
use crystal_chat::cli::Args;
use crystal_chat::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Warnings raised while the configuration is loaded, before the configured
/// subscriber exists.
fn bootstrap_subscriber<W>(make_writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(make_writer)
        .with_ansi(false)
        .finish()
}

fn init_tracing(config: &Config) {
    // RUST_LOG wins over the configured level.
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match config.log.level.parse::<EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid tracing filter ({}); falling back to 'info'",
                    config.log.level, e
                );
                EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if config.log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), || {
        Config::load(args.config.as_deref())
    })?;
    args.apply(&mut config);

    init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "crystal-chat starting");

    let app = Application::new(args, config);
    app.run().await?;
    Ok(())
}
