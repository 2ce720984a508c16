use burrow::{App, Config, ConnectionConfig, Registry};
use tests::{MockDriver, SchemaDir};

#[tokio::test]
async fn duplicate_model_names_on_one_connection_abort() {
    let schemas = SchemaDir::new();
    schemas.write("a/first.json", r#"{ "name": "Animal" }"#);
    schemas.write("a/second.json", r#"{ "name": "Animal" }"#);

    let driver = MockDriver::new();
    let log = driver.log();

    let config = Config::single(
        ConnectionConfig::new("mongodb://localhost:27017/test").schema_pattern("a/*.json"),
    );

    let app = App::new();
    let err = app
        .register_with(
            Registry::builder(config)
                .driver(driver)
                .schema_root(schemas.path()),
        )
        .await
        .unwrap_err();

    assert!(err.is_model_conflict());
    assert!(err.to_string().contains("Animal"));
    assert!(app.registry().is_none());
    assert_eq!(log.closed(), vec!["test"]);
}

#[tokio::test]
async fn same_model_name_on_different_connections_is_fine() {
    let schemas = SchemaDir::new();
    schemas.write("one/animal.json", r#"{ "name": "Animal" }"#);
    schemas.write("two/animal.json", r#"{ "name": "Animal" }"#);

    let config = Config::list(vec![
        ConnectionConfig::new("mongodb://localhost:27017/test-1").schema_pattern("one/*.json"),
        ConnectionConfig::new("mongodb://localhost:27017/test-2").schema_pattern("two/*.json"),
    ]);

    let registry = App::new()
        .register_with(
            Registry::builder(config)
                .driver(MockDriver::new())
                .schema_root(schemas.path()),
        )
        .await
        .unwrap();

    assert!(registry.get("test-1").unwrap().model("Animal").is_some());
    assert!(registry.get("test-2").unwrap().model("Animal").is_some());
}
