use burrow::{App, Config, ConnectionConfig, Registry};
use burrow_core::driver::ReadyState;
use serde_json::json;
use tests::{MockDriver, SchemaDir};

#[tokio::test]
async fn shutdown_releases_every_connection() {
    let driver = MockDriver::new();
    let log = driver.log();

    let config = Config::list(vec![
        ConnectionConfig::new("mongodb://localhost:27017/test-1"),
        ConnectionConfig::new("mongodb://localhost:27017/test-2"),
    ]);

    let app = App::new();
    let registry = app
        .register_with(Registry::builder(config).driver(driver))
        .await
        .unwrap();

    app.shutdown().await;

    let mut closed = log.closed();
    closed.sort();
    assert_eq!(closed, vec!["test-1", "test-2"]);

    // A registry handle held across shutdown observes the released state.
    for (_, entry) in registry.iter() {
        assert_eq!(entry.connection().ready_state(), ReadyState::Disconnected);
    }
    assert!(app.registry().is_none());
}

#[tokio::test]
async fn operations_fail_after_shutdown() {
    let schemas = SchemaDir::new();
    schemas.write("animal.json", r#"{ "name": "Animal" }"#);

    let config = Config::single(
        ConnectionConfig::new("mongodb://localhost:27017/zoo").schema_pattern("*.json"),
    );

    let app = App::new();
    let registry = app
        .register_with(
            Registry::builder(config)
                .driver(MockDriver::new())
                .schema_root(schemas.path()),
        )
        .await
        .unwrap();

    let animal = registry.models().unwrap()["Animal"].clone();
    app.shutdown().await;

    assert!(animal.create(json!({ "name": "Rikki" })).await.is_err());
}

#[tokio::test]
async fn registration_after_shutdown_is_allowed() {
    let app = App::new();
    app.register_with(
        Registry::builder(Config::single(ConnectionConfig::new(
            "mongodb://localhost:27017/test",
        )))
        .driver(MockDriver::new()),
    )
    .await
    .unwrap();

    app.shutdown().await;

    // The namespace was cleared with the teardown.
    app.register_with(
        Registry::builder(Config::single(ConnectionConfig::new(
            "mongodb://localhost:27017/test",
        )))
        .driver(MockDriver::new()),
    )
    .await
    .unwrap();
}
