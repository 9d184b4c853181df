//! Issue commands to an HAProxy over a stats socket and decode its CSV statistics.
//!
//! Every command opens a connection of its own, writes one command line and reads until HAProxy
//! closes the socket. Tabular responses such as `show stat` are decoded by column name into
//! records declared with a static field table (see [`schema::Record`]).
//!
//! # Examples
//! ```no_run
//! use hastat::{ConnectionBuilder, UnixSocketBuilder};
//! use hastat::models::Stat;
//! use hastat::requests::Selector;
//!
//! let socket_builder = UnixSocketBuilder::default();
//! let stats: Vec<Stat> = socket_builder
//!     .connect()
//!     .and_then(|connection| connection.stats(&Selector::proxy("app")))
//!     .expect("Failed to query stats");
//! for stat in stats {
//!     println!("{} {} {}", stat.server, stat.status, stat.sessions_current);
//! }
//! ```

mod commands;
mod connection;
pub mod decoder;
pub mod errors;
pub mod models;
pub mod parsers;
pub mod requests;
pub mod responses;
pub mod schema;

pub use connection::{send, Connection, ConnectionBuilder, UnixSocketBuilder};
pub use decoder::{decode, decode_dynamic, Decoder};
pub use errors::{Error, Result};
