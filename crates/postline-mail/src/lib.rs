//! # postline-mail
//!
//! A small mail-sending facade: obtain a configured [`MailClient`] and send
//! one message at a time. Delivery is delegated to a [`Transport`]; the
//! default one speaks SMTP through `lettre`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use postline_mail::{MailClientOptions, Subtype, get_client};
//!
//! #[tokio::main]
//! async fn main() -> postline_mail::Result<()> {
//!     let options = MailClientOptions::builder("smtp.example.com")
//!         .starttls(true)
//!         .credentials("me@example.com", "app-password")
//!         .build();
//!
//!     let client = get_client(Some(options))?;
//!     client
//!         .send(
//!             "me@example.com",
//!             ["you@example.com"],
//!             "Hello",
//!             "<b>Hi!</b>",
//!             Subtype::Html,
//!         )
//!         .await?;
//!
//!     // Or with the configuration from POSTLINE_MAIL_* variables:
//!     postline_mail::send("me@example.com", "you@example.com", "Hi", "text", Subtype::Plain)
//!         .await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`options`]: typed configuration and environment defaults
//! - [`properties`]: flat property bags and [`to_properties`]
//! - [`recipients`]: recipient input and [`parse_recipients`]
//! - [`transport`]: the [`Transport`] trait and its implementations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod client;
mod error;
mod message;
pub mod options;
pub mod properties;
pub mod recipients;
pub mod transport;

pub use address::{Address, Mailbox};
pub use client::{MailClient, get_client, send};
pub use error::{Error, Result};
pub use message::{Body, OutgoingMessage, Subtype};
pub use options::{MailClientOptions, OptionsBuilder, Protocol, Security, ValidationError};
pub use properties::{Properties, to_properties};
pub use recipients::{OneOrMany, RecipientMap, RecipientType, Recipients, parse_recipients};
pub use transport::{MemoryTransport, SmtpTransport, Transport, TransportError};
