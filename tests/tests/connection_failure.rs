use burrow::{App, Config, ConnectionConfig, Registry};
use std::time::Duration;
use tests::MockDriver;

#[tokio::test]
async fn unreachable_host_aborts_the_batch() {
    let driver = MockDriver::new().refuse("db-two.internal");
    let log = driver.log();

    let config = Config::list(vec![
        ConnectionConfig::new("mongodb://db-one.internal:27017/one"),
        ConnectionConfig::new("mongodb://db-two.internal:27018/two"),
    ]);

    let app = App::new();
    let err = app
        .register_with(Registry::builder(config).driver(driver))
        .await
        .unwrap_err();

    assert!(err.is_connection_failed());
    assert!(err.to_string().contains("db-two.internal:27018"));

    // Nothing is published, not even the entry that connected fine, and the
    // sibling that did connect is released.
    assert!(app.registry().is_none());
    assert_eq!(log.closed(), vec!["one"]);
}

#[tokio::test]
async fn failure_carries_the_driver_cause() {
    let config = Config::single(ConnectionConfig::new("mongodb://db.internal:27017/test"));

    let err = App::new()
        .register_with(Registry::builder(config).driver(MockDriver::new().refuse("db.internal")))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "failed to connect to db.internal:27017: connection refused"
    );
}

#[tokio::test]
async fn hung_connect_is_bounded_by_the_configured_timeout() {
    let config = Config::single(ConnectionConfig::new("mongodb://slow.internal:27017/test"));

    let err = App::new()
        .register_with(
            Registry::builder(config)
                .driver(MockDriver::new().hang("slow.internal"))
                .connect_timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    assert!(err.is_connection_failed());
    assert!(err.to_string().contains("timed out"));
}
