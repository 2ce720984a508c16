use burrow::{app, App, Config, ConnectionConfig, Registry};
use tests::MockDriver;

fn config() -> Config {
    Config::single(ConnectionConfig::new("mongodb://localhost:27017/test"))
}

#[tokio::test]
async fn second_registration_is_rejected_before_any_connect() {
    let app = App::new();
    app.register_with(Registry::builder(config()).driver(MockDriver::new()))
        .await
        .unwrap();

    let driver = MockDriver::new();
    let log = driver.log();

    let err = app
        .register_with(Registry::builder(config()).driver(driver))
        .await
        .unwrap_err();

    assert!(err.is_duplicate_registration());
    assert!(err.to_string().contains(app::NAMESPACE));
    assert_eq!(log.connect_count(), 0);
}

#[tokio::test]
async fn failed_registration_frees_the_identity_for_retry() {
    let app = App::new();

    let err = app
        .register_with(
            Registry::builder(config()).driver(MockDriver::new().refuse("localhost")),
        )
        .await
        .unwrap_err();
    assert!(err.is_connection_failed());

    // The reservation was rolled back, so a later attempt succeeds.
    let registry = app
        .register_with(Registry::builder(config()).driver(MockDriver::new()))
        .await
        .unwrap();
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn independent_hosts_do_not_interfere() {
    let first = App::new();
    let second = App::new();

    first
        .register_with(Registry::builder(config()).driver(MockDriver::new()))
        .await
        .unwrap();
    second
        .register_with(Registry::builder(config()).driver(MockDriver::new()))
        .await
        .unwrap();

    assert!(first.registry().is_some());
    assert!(second.registry().is_some());
}
