//! Event-exchange socket server: accepts connections from the transport
//! simulator, negotiates a session per connection and forwards events to a
//! dedicated simulation worker.

pub mod handler;
pub mod protocol;
pub mod server;

use thiserror::Error;

pub use handler::handle_client;
pub use protocol::{Handshake, ProtocolError, ACK};
pub use server::{run_server, serve};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("socket error")]
    Io(#[from] std::io::Error),
    #[error("worker terminated unexpectedly")]
    WorkerDied,
}
