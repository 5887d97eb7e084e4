//! The mail client facade.

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::message::{OutgoingMessage, Subtype};
use crate::options::MailClientOptions;
use crate::properties::Properties;
use crate::recipients::{RecipientType, Recipients};
use crate::transport::{SmtpTransport, Transport};

/// Sends mail through a [`Transport`] configured from [`MailClientOptions`].
///
/// The options are fixed at construction; two clients never share
/// configuration state.
#[derive(Debug)]
pub struct MailClient<T = SmtpTransport> {
    options: MailClientOptions,
    transport: T,
}

impl MailClient<SmtpTransport> {
    /// Creates an SMTP-backed client from options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the options fail validation, or a
    /// transport error if the SMTP transport cannot be built.
    pub fn new(options: MailClientOptions) -> Result<Self> {
        validate(&options)?;
        let transport = SmtpTransport::new(&options)?;
        Ok(Self { options, transport })
    }
}

impl<T: Transport> MailClient<T> {
    /// Creates a client over an explicit transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the options fail validation.
    pub fn with_transport(options: MailClientOptions, transport: T) -> Result<Self> {
        validate(&options)?;
        Ok(Self { options, transport })
    }

    /// Options this client was built with.
    #[must_use]
    pub const fn options(&self) -> &MailClientOptions {
        &self.options
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends one message.
    ///
    /// `recipients` accepts a single address, a list of addresses (both
    /// treated as To) or a [`RecipientMap`](crate::RecipientMap) keyed by
    /// type. `subtype` only affects how `text` is labelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] or [`Error::NoRecipients`] for bad
    /// input, and [`Error::Transport`] if delivery fails.
    pub async fn send(
        &self,
        from: &str,
        recipients: impl Into<Recipients>,
        subject: &str,
        text: &str,
        subtype: Subtype,
    ) -> Result<()> {
        let message =
            OutgoingMessage::compose(from, &recipients.into(), subject, text, subtype)?;
        self.send_message(&message).await
    }

    /// Sends a message that has already been composed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRecipients`] if the message has no recipients and
    /// [`Error::Transport`] if delivery fails.
    pub async fn send_message(&self, message: &OutgoingMessage) -> Result<()> {
        if message.recipient_count() == 0 {
            return Err(Error::NoRecipients);
        }

        info!(
            host = %self.options.host,
            port = self.options.port,
            from = %message.from.address,
            recipients = message.recipient_count(),
            subtype = %message.body.subtype,
            "Sending mail"
        );

        self.transport.send(message).await.map_err(|e| {
            warn!(error = %e, "Mail delivery failed");
            Error::from(e)
        })
    }

    /// Checks that the configured server is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the check itself fails.
    pub async fn test_connection(&self) -> Result<bool> {
        Ok(self.transport.test_connection().await?)
    }

    /// Normalises an options object into a property bag.
    ///
    /// See [`to_properties`](crate::to_properties).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProperties`] if `properties` is not a flat
    /// object of scalars.
    pub fn to_properties(&self, properties: &Value) -> Result<Properties> {
        crate::properties::to_properties(properties)
    }

    /// Extracts the addresses of one recipient type.
    ///
    /// See [`parse_recipients`](crate::parse_recipients).
    #[must_use]
    pub fn parse_recipients(&self, recipients: &Recipients, kind: RecipientType) -> Vec<String> {
        crate::recipients::parse_recipients(recipients, kind)
    }
}

fn validate(options: &MailClientOptions) -> Result<()> {
    options.validate().map_err(|errors| {
        Error::Config(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    })
}

/// Returns a client for `options`, or for the default configuration
/// ([`MailClientOptions::load`]) when `options` is `None`.
///
/// # Errors
///
/// Returns an error if the default configuration cannot be loaded or the
/// options are invalid.
pub fn get_client(options: Option<MailClientOptions>) -> Result<MailClient> {
    let options = match options {
        Some(options) => options,
        None => MailClientOptions::load()?,
    };
    MailClient::new(options)
}

/// Sends one message using the default configuration.
///
/// Equivalent to `get_client(None)?.send(...)`.
///
/// # Errors
///
/// See [`get_client`] and [`MailClient::send`].
pub async fn send(
    from: &str,
    recipients: impl Into<Recipients>,
    subject: &str,
    text: &str,
    subtype: Subtype,
) -> Result<()> {
    get_client(None)?
        .send(from, recipients, subject, text, subtype)
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use serde_json::json;

    fn client() -> (MailClient<MemoryTransport>, MemoryTransport) {
        let transport = MemoryTransport::new();
        let client =
            MailClient::with_transport(MailClientOptions::default(), transport.clone()).unwrap();
        (client, transport)
    }

    #[tokio::test]
    async fn test_send_records_message() {
        let (client, transport) = client();
        client
            .send(
                "me@example.com",
                ["a@example.com", "b@example.com"],
                "Subject",
                "Body",
                Subtype::Plain,
            )
            .await
            .unwrap();

        let sent = transport.last().unwrap();
        assert_eq!(sent.from.address.as_str(), "me@example.com");
        assert_eq!(sent.to.len(), 2);
        assert_eq!(sent.subject, "Subject");
    }

    #[tokio::test]
    async fn test_send_without_recipients() {
        let (client, transport) = client();
        let err = client
            .send("me@example.com", Recipients::default(), "s", "t", Subtype::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoRecipients));
        assert!(transport.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let (client, transport) = client();
        transport.fail_next(crate::TransportError::rejected(550, "mailbox unavailable"));

        let err = client
            .send("me@example.com", "a@example.com", "s", "t", Subtype::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(ref e) if e.is_permanent()));
    }

    #[tokio::test]
    async fn test_send_message_rejects_empty() {
        let (client, _) = client();
        let message = OutgoingMessage::new(
            crate::Mailbox::new("me@example.com").unwrap(),
            "s",
            crate::Body {
                text: String::new(),
                subtype: Subtype::Plain,
            },
        );
        assert!(matches!(
            client.send_message(&message).await,
            Err(Error::NoRecipients)
        ));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = MailClientOptions {
            port: 0,
            ..MailClientOptions::default()
        };
        let err = MailClient::with_transport(options, MemoryTransport::new()).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("port")));
    }

    #[test]
    fn test_helpers_delegate() {
        let (client, _) = client();
        let props = client.to_properties(&json!({ "mail.smtp.port": 25 })).unwrap();
        assert_eq!(props.get("mail.smtp.port"), Some("25"));

        let recipients = Recipients::from("a@example.com");
        assert_eq!(
            client.parse_recipients(&recipients, RecipientType::To),
            vec!["a@example.com"]
        );
        assert!(client.parse_recipients(&recipients, RecipientType::Cc).is_empty());
    }

    #[tokio::test]
    async fn test_get_client_with_options() {
        let options = MailClientOptions::builder("smtp.example.com").port(2525).build();
        let client = get_client(Some(options.clone())).unwrap();
        assert_eq!(client.options(), &options);
    }
}
