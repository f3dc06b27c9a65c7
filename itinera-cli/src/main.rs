use anyhow::Context;
use itinera_cli::{parse, render, App, AppError, CommandError, Outcome};
use itinera_presenter::{TimeLimits, TripPresenter};
use itinera_store::app_config::Config;
use itinera_store::{FilterModel, MockBackend, MockGenerator, TripModel};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Itinera (seed {:?})", config.mock.seed);

    let data = MockGenerator::new(config.mock.seed).data(&config.mock);
    let backend = MockBackend::new(data)
        .with_latency(std::time::Duration::from_millis(config.mock.latency_ms));
    backend.set_fail_mutations(config.mock.fail_mutations);
    backend.set_fail_catalogs(config.mock.fail_catalogs);

    let model = Arc::new(TripModel::new(Arc::new(backend)));
    let limits = TimeLimits {
        lower: config.ui.lower_limit(),
        upper: config.ui.upper_limit(),
    };
    let mut presenter = TripPresenter::new(model.clone(), Arc::new(FilterModel::new()), limits);

    presenter.init();
    println!("{}", render(&presenter.screen()));

    model.init().await;
    presenter.pump()?;

    let mut app = App::new(presenter, model);
    println!("{}", render(&app.presenter().screen()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match app.execute(command).await {
            Ok(Outcome::Render) => println!("{}", render(&app.presenter().screen())),
            Ok(Outcome::Print(text)) => println!("{text}"),
            Ok(Outcome::Quit) => break,
            Err(AppError::Programming(e)) => {
                tracing::error!("Presenter invariant violated: {}", e);
                return Err(e.into());
            }
            Err(e) => println!("{e}"),
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
