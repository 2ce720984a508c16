use burrow::{App, Config, ConnectionConfig, Registry, View};
use pretty_assertions::assert_eq;
use tests::MockDriver;

#[tokio::test]
async fn keys_are_alias_then_database_name() {
    let config = Config::list(vec![
        ConnectionConfig::new("mongodb://localhost:27017/test-1").alias("test-db"),
        ConnectionConfig::new("mongodb://localhost:27017/test-2"),
    ]);

    let app = App::new();
    let registry = app
        .register_with(Registry::builder(config).driver(MockDriver::new()))
        .await
        .unwrap();

    assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["test-db", "test-2"]);

    // The alias entry still targets the database named in its URI.
    let entry = registry.get("test-db").unwrap();
    assert_eq!(entry.connection().database(), "test-1");

    let entry = registry.get("test-2").unwrap();
    assert_eq!(entry.connection().database(), "test-2");
}

#[tokio::test]
async fn multi_connection_form_publishes_the_keyed_view() {
    let config = Config::list(vec![ConnectionConfig::new(
        "mongodb://localhost:27017/only",
    )]);

    let registry = App::new()
        .register_with(Registry::builder(config).driver(MockDriver::new()))
        .await
        .unwrap();

    // A one-element list is still the keyed form; flattening is only for
    // the `connection` field.
    match registry.view() {
        View::Keyed(entries) => {
            assert_eq!(entries.len(), 1);
            assert!(entries.contains_key("only"));
        }
        View::Single(_) => panic!("expected the keyed form"),
    }
    assert!(registry.connection().is_none());
}

#[tokio::test]
async fn every_entry_has_a_models_map() {
    let config = Config::list(vec![
        ConnectionConfig::new("mongodb://localhost:27017/test-1"),
        ConnectionConfig::new("mongodb://localhost:27017/test-2"),
    ]);

    let registry = App::new()
        .register_with(Registry::builder(config).driver(MockDriver::new()))
        .await
        .unwrap();

    for (_, entry) in registry.iter() {
        assert!(entry.models().is_empty());
    }
}
