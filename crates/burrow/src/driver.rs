pub use burrow_core::driver::{
    operation::{self, Operation},
    ConnectOptions, Connection, Driver, ReadyState, Response, Rows,
};
