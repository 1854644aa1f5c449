//! Blocking IMAP client engine: an incremental, chunk-tolerant response
//! parser plus a synchronous command/response session, with thin mailbox
//! operations layered on top.

pub mod builder;
pub mod commands;
pub mod error;
mod extract;
pub mod messages;
mod operations;
pub mod parser;
pub mod session;

pub use builder::{Builder, Connector, TlsStream, connect_tls};
pub use commands::{Command, FetchItem, Flag, SearchKey};
pub use error::ImapError;
pub use messages::Message;
pub use parser::{Reply, Response, ResponseParser};
pub use session::Session;

/// Name of the mailbox every server provides.
pub const INBOX: &str = "INBOX";
