use burrow::{App, Config, ConnectionConfig, Registry};
use tests::{MockDriver, SchemaDir};

#[tokio::test]
async fn excluded_files_never_reach_the_registry() {
    let schemas = SchemaDir::new();
    schemas.write(
        "a/keep.json",
        r#"{ "name": "Keep", "fields": { "name": "string" } }"#,
    );
    schemas.write("a/skip.json", r#"{ "name": "Skip" }"#);

    let config = Config::single(
        ConnectionConfig::new("mongodb://localhost:27017/test")
            .schema_pattern("a/**/*.json")
            .schema_pattern("!a/skip.json"),
    );

    let registry = App::new()
        .register_with(
            Registry::builder(config)
                .driver(MockDriver::new())
                .schema_root(schemas.path()),
        )
        .await
        .unwrap();

    let models = registry.models().unwrap();
    assert!(models.contains_key("Keep"));
    assert!(!models.contains_key("Skip"));
    assert_eq!(models["Keep"].name(), "Keep");
}

#[tokio::test]
async fn model_name_comes_from_the_declared_identifier_not_the_filename() {
    let schemas = SchemaDir::new();
    schemas.write("zoo/mammals.json", r#"{ "name": "Otter" }"#);

    let config = Config::single(
        ConnectionConfig::new("mongodb://localhost:27017/test").schema_pattern("zoo/*.json"),
    );

    let registry = App::new()
        .register_with(
            Registry::builder(config)
                .driver(MockDriver::new())
                .schema_root(schemas.path()),
        )
        .await
        .unwrap();

    let models = registry.models().unwrap();
    assert_eq!(models.keys().collect::<Vec<_>>(), vec!["Otter"]);
}

#[tokio::test]
async fn resolution_is_idempotent_across_registrations() {
    let schemas = SchemaDir::new();
    schemas.write("m/a.json", r#"{ "name": "Alpha" }"#);
    schemas.write("m/b.json", r#"{ "name": "Beta" }"#);
    schemas.write("m/c.json", r#"{ "name": "Gamma" }"#);

    let mut runs = Vec::new();
    for _ in 0..2 {
        let config = Config::single(
            ConnectionConfig::new("mongodb://localhost:27017/test")
                .schema_pattern("m/*.json"),
        );

        let registry = App::new()
            .register_with(
                Registry::builder(config)
                    .driver(MockDriver::new())
                    .schema_root(schemas.path()),
            )
            .await
            .unwrap();

        let names: Vec<String> = registry.models().unwrap().keys().cloned().collect();
        runs.push(names);
    }

    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[0], vec!["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn no_matches_publish_an_empty_models_map() {
    let schemas = SchemaDir::new();

    let config = Config::single(
        ConnectionConfig::new("mongodb://localhost:27017/test")
            .schema_pattern("missing/**/*.json"),
    );

    let registry = App::new()
        .register_with(
            Registry::builder(config)
                .driver(MockDriver::new())
                .schema_root(schemas.path()),
        )
        .await
        .unwrap();

    assert!(registry.models().unwrap().is_empty());
}

#[tokio::test]
async fn broken_definition_aborts_the_whole_registration() {
    let schemas = SchemaDir::new();
    schemas.write("good/animal.json", r#"{ "name": "Animal" }"#);
    schemas.write("bad/broken.json", "{ not json");

    let driver = MockDriver::new();
    let log = driver.log();

    // The first connection is fine; the second one's schema file is broken.
    let config = Config::list(vec![
        ConnectionConfig::new("mongodb://localhost:27017/one").schema_pattern("good/*.json"),
        ConnectionConfig::new("mongodb://localhost:27017/two").schema_pattern("bad/*.json"),
    ]);

    let app = App::new();
    let err = app
        .register_with(
            Registry::builder(config)
                .driver(driver)
                .schema_root(schemas.path()),
        )
        .await
        .unwrap_err();

    assert!(err.is_schema_resolution());
    assert!(err.to_string().contains("broken.json"));

    // No partial registry, and both opened connections were released.
    assert!(app.registry().is_none());
    let mut closed = log.closed();
    closed.sort();
    assert_eq!(closed, vec!["one", "two"]);
}
