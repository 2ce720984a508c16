pub use mock::{Log, MockDriver};

pub use schema_dir::SchemaDir;
