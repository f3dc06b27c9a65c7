use itinera_cli::{parse, render, App, AppError, Outcome};
use itinera_presenter::{Mode, Placeholder, TimeLimits, TripPresenter};
use itinera_store::app_config::MockConfig;
use itinera_store::{FilterModel, MockBackend, MockGenerator, TripModel};
use std::sync::Arc;

async fn app_with(config: MockConfig) -> App {
    let data = MockGenerator::new(config.seed).data(&config);
    let backend = MockBackend::new(data);
    backend.set_fail_catalogs(config.fail_catalogs);

    let model = Arc::new(TripModel::new(Arc::new(backend)));
    let mut presenter =
        TripPresenter::new(model.clone(), Arc::new(FilterModel::new()), TimeLimits::default());
    presenter.init();
    model.init().await;
    presenter.pump().unwrap();
    App::new(presenter, model)
}

async fn app() -> App {
    app_with(MockConfig {
        seed: Some(7),
        points: 5,
        ..MockConfig::default()
    })
    .await
}

async fn run(app: &mut App, line: &str) -> Result<Outcome, AppError> {
    app.execute(parse(line)?).await
}

#[tokio::test(start_paused = true)]
async fn test_renders_seeded_trip() {
    let app = app().await;
    let text = render(&app.presenter().screen());

    assert!(text.contains("Total: €"));
    assert!(text.contains("[x] everything (5)"));
    assert!(text.contains("[+ New event]"));
    assert!(text.contains("(•) day"));
    assert!(text.lines().any(|line| line.starts_with("5. ")));
}

#[tokio::test(start_paused = true)]
async fn test_edit_and_save_row() {
    let mut app = app().await;

    assert_eq!(run(&mut app, "open 1").await.unwrap(), Outcome::Render);
    assert!(render(&app.presenter().screen()).contains("1. [edit]"));

    run(&mut app, "price 1 777").await.unwrap();
    run(&mut app, "save 1").await.unwrap();

    assert!(app
        .presenter()
        .visible_ids()
        .iter()
        .all(|id| app.presenter().presenter(*id).unwrap().mode() == Mode::Display));
    let Outcome::Print(json) = run(&mut app, "dump").await.unwrap() else {
        panic!("dump should print");
    };
    assert!(json.contains("\"base_price\": 777"));
}

#[tokio::test(start_paused = true)]
async fn test_form_errors_are_reported() {
    let mut app = app().await;

    assert!(matches!(
        run(&mut app, "price 1 10").await,
        Err(AppError::FormClosed)
    ));
    assert!(matches!(
        run(&mut app, "open 42").await,
        Err(AppError::NoSuchRow(42))
    ));
    assert!(matches!(
        run(&mut app, "sort cheapest").await,
        Err(AppError::Command(_))
    ));

    run(&mut app, "open 2").await.unwrap();
    run(&mut app, "price 2 -5").await.unwrap();
    assert!(render(&app.presenter().screen()).contains("! Price must not be negative: -5"));
}

#[tokio::test(start_paused = true)]
async fn test_create_and_cancel() {
    let mut app = app().await;

    run(&mut app, "new").await.unwrap();
    let text = render(&app.presenter().screen());
    assert!(text.contains("new. [create] Flight ?"));
    assert!(text.contains("[+ New event] (disabled)"));

    run(&mut app, "esc").await.unwrap();
    assert!(!app.presenter().new_point().is_open());
    assert!(!render(&app.presenter().screen()).contains("(disabled)"));
}

#[tokio::test(start_paused = true)]
async fn test_catalog_failure_screen() {
    let app = app_with(MockConfig {
        seed: Some(3),
        fail_catalogs: true,
        ..MockConfig::default()
    })
    .await;

    let text = render(&app.presenter().screen());
    assert!(text.contains(Placeholder::LoadFailed.message()));
    assert!(!text.contains("[+ New event]"));
}

#[tokio::test(start_paused = true)]
async fn test_quit_and_help() {
    let mut app = app().await;
    assert_eq!(run(&mut app, "quit").await.unwrap(), Outcome::Quit);
    assert!(matches!(run(&mut app, "help").await, Ok(Outcome::Print(_))));
}
