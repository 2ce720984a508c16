mod value;

use burrow_core::{
    async_trait,
    driver::{operation, ConnectOptions, Connection, Driver, Operation, ReadyState, Response},
    err, Error, Result,
};

use futures::stream::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Database};
use serde_json::Value;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use url::Url;

/// MongoDB driver.
///
/// Connects through the official `mongodb` client; one [`MongoConnection`]
/// per registry target.
#[derive(Debug, Default)]
pub struct MongoDb;

impl MongoDb {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Driver for MongoDb {
    async fn connect(&self, url: &Url, options: &ConnectOptions) -> Result<Box<dyn Connection>> {
        if url.scheme() != "mongodb" {
            return Err(err!(
                "connection URL does not have a `mongodb` scheme; url={url}"
            ));
        }

        let host = url
            .host_str()
            .ok_or_else(|| err!("missing host in connection URL; url={url}"))?
            .to_string();
        let port = url.port();

        let database_name = url
            .path()
            .trim_start_matches('/')
            .split('?')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("test")
            .to_string();

        let mut client_options = ClientOptions::parse(url.as_str())
            .await
            .map_err(|error| err!("invalid mongodb connection URL: {error}"))?;
        apply_options(&mut client_options, options);

        let client = Client::with_options(client_options).map_err(driver_error)?;
        let database = client.database(&database_name);

        let connection = MongoConnection {
            client,
            database,
            host,
            port,
            database_name,
            state: AtomicU8::new(ReadyState::Connecting as u8),
        };

        // `Client` construction is lazy; a ping forces the first round trip
        // so DNS, refused-connection, and auth failures surface here.
        connection
            .database
            .run_command(bson::doc! { "ping": 1 })
            .await
            .map_err(driver_error)?;

        connection
            .state
            .store(ReadyState::Connected as u8, Ordering::SeqCst);
        Ok(Box::new(connection))
    }
}

/// Applies the driver options this driver recognizes onto the client
/// options. Registry-level options (the `urlParser` flag) and unrecognized
/// keys are ignored.
fn apply_options(client_options: &mut ClientOptions, options: &ConnectOptions) {
    if let Some(Value::String(name)) = options.get("appName") {
        client_options.app_name = Some(name.clone());
    }

    if let Some(size) = options.get("maxPoolSize").and_then(Value::as_u64) {
        client_options.max_pool_size = Some(size as u32);
    }

    if let Some(ms) = options.get("serverSelectionTimeoutMS").and_then(Value::as_u64) {
        client_options.server_selection_timeout = Some(Duration::from_millis(ms));
    }
}

fn driver_error(error: impl std::fmt::Display) -> Error {
    err!("{error}")
}

/// A live connection to one MongoDB database.
#[derive(Debug)]
pub struct MongoConnection {
    client: Client,
    database: Database,
    host: String,
    port: Option<u16>,
    database_name: String,
    state: AtomicU8,
}

#[async_trait]
impl Connection for MongoConnection {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> Option<u16> {
        self.port
    }

    fn database(&self) -> &str {
        &self.database_name
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_u8(self.state.load(Ordering::SeqCst))
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let state = self.ready_state();
        if !state.is_connected() {
            return Err(err!(
                "connection to `{}` is {state}",
                self.database_name
            ));
        }

        match op {
            Operation::Insert(insert) => self.insert(insert).await,
            Operation::Find(find) => self.find(find).await,
            Operation::Update(update) => self.update(update).await,
            Operation::Delete(delete) => self.delete(delete).await,
        }
    }

    async fn close(&self) -> Result<()> {
        self.state
            .store(ReadyState::Disconnecting as u8, Ordering::SeqCst);
        self.client.clone().shutdown().await;
        self.state
            .store(ReadyState::Disconnected as u8, Ordering::SeqCst);
        Ok(())
    }
}

impl MongoConnection {
    async fn insert(&self, op: operation::Insert) -> Result<Response> {
        let collection = self.database.collection::<bson::Document>(&op.collection);

        let mut documents = Vec::with_capacity(op.documents.len());
        for document in &op.documents {
            documents.push(value::to_document(document)?);
        }

        let count = documents.len();
        if count == 1 {
            collection
                .insert_one(documents.into_iter().next().unwrap())
                .await
                .map_err(driver_error)?;
        } else if count > 1 {
            collection.insert_many(documents).await.map_err(driver_error)?;
        }

        Ok(Response::count(count as u64))
    }

    async fn find(&self, op: operation::Find) -> Result<Response> {
        let collection = self.database.collection::<bson::Document>(&op.collection);
        let filter = value::to_document(&op.filter)?;

        let mut find = collection.find(filter);
        if let Some(limit) = op.limit {
            find = find.limit(limit as i64);
        }

        let cursor = find.await.map_err(driver_error)?;
        let documents: Vec<bson::Document> =
            cursor.try_collect().await.map_err(driver_error)?;

        Ok(Response::documents(
            documents.iter().map(value::from_document).collect(),
        ))
    }

    async fn update(&self, op: operation::Update) -> Result<Response> {
        let collection = self.database.collection::<bson::Document>(&op.collection);
        let filter = value::to_document(&op.filter)?;
        let changes = value::to_document(&op.changes)?;

        let mut update_doc = bson::Document::new();
        update_doc.insert("$set", changes);

        let result = collection
            .update_many(filter, update_doc)
            .await
            .map_err(driver_error)?;
        Ok(Response::count(result.modified_count))
    }

    async fn delete(&self, op: operation::Delete) -> Result<Response> {
        let collection = self.database.collection::<bson::Document>(&op.collection);
        let filter = value::to_document(&op.filter)?;

        let result = collection.delete_many(filter).await.map_err(driver_error)?;
        Ok(Response::count(result.deleted_count))
    }
}
