use clap::Parser;
use shopping_list::cli::{run, Cli};
use shopping_list::ui::ConsoleView;
use shopping_list::{ClientConfig, HttpApi, ListSyncController};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(cli.log_level.parse()?))
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.clone());
    }
    debug!("using API at {}", config.base_url);

    let api = HttpApi::new(&config)?;
    let controller = ListSyncController::new(api, ConsoleView::new(cli.yes), &config);

    let outcome = run(&controller, &cli.command).await;
    controller
        .view()
        .present(cli.command.sections(), &mut std::io::stdout().lock())?;

    if outcome.is_err() {
        std::process::exit(1);
    }
    Ok(())
}
