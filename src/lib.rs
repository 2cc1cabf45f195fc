//! Server side of the KalSMS phone gateway.
//!
//! A phone running the KalSMS app POSTs form data to the server. This crate
//! authenticates the request signature, turns the request into a typed
//! [`Action`] and renders the XML reply the phone expects:
//!
//! ```no_run
//! use kalsms::{Action, Gateway, OutgoingMessage, Request};
//!
//! # fn handle(request: Request) -> Result<String, kalsms::GatewayError> {
//! let gateway = Gateway::from_request(request);
//! if !gateway.is_authenticated("secret") {
//!     return Ok(String::new());
//! }
//! let reply = match gateway.action()? {
//!     Action::Outgoing(outgoing) => outgoing.render_response(&[OutgoingMessage::new(
//!         "1",
//!         "+15551234567",
//!         "Hello",
//!     )]),
//!     other => other.render_response(&[]).unwrap_or_default(),
//! };
//! # Ok(reply)
//! # }
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod signature;
pub mod types;
pub mod xml;

pub use action::{dispatch, Action, Incoming, MmsPart, Outgoing, SendStatus};
pub use config::Config;
pub use error::GatewayError;
pub use gateway::Gateway;
pub use types::{
    MessageType, OutgoingMessage, Request, SendStatusKind, UploadError, UploadedFile,
};
pub use xml::escape_for_xml;
