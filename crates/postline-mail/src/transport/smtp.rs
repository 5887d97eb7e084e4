//! SMTP delivery through `lettre`.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, warn};

use super::{Transport, TransportError};
use crate::address::{Address, Mailbox};
use crate::message::{OutgoingMessage, Subtype};
use crate::options::{MailClientOptions, Security};

/// Transport that delivers over SMTP.
///
/// Constructing it does not open a connection; the first `send` or
/// `test_connection` does.
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpTransport {
    /// Builds a transport from client options.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] if TLS parameters cannot be set up
    /// for the host.
    pub fn new(options: &MailClientOptions) -> Result<Self, TransportError> {
        let host = options.host.as_str();
        let builder = match options.security() {
            // Implicit TLS (typically port 465)
            Security::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| TransportError::Build(format!("SMTP relay error: {e}")))?,
            // STARTTLS (typically port 587)
            Security::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| TransportError::Build(format!("SMTP STARTTLS error: {e}")))?,
            Security::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        let mut builder = builder
            .port(options.port)
            .timeout(Some(options.timeout));

        if options.auth {
            if let (Some(user), Some(password)) = (&options.user, &options.password) {
                builder = builder
                    .credentials(Credentials::new(user.clone(), password.clone()))
                    .authentication(vec![Mechanism::Plain, Mechanism::Login]);
            }
        }

        debug!(
            host,
            port = options.port,
            security = options.security().display_name(),
            auth = options.auth,
            "Built SMTP transport"
        );

        Ok(Self {
            inner: builder.build(),
            host: options.host.clone(),
            port: options.port,
        })
    }
}

impl Transport for SmtpTransport {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), TransportError> {
        let email = build_message(message)?;

        match self.inner.send(email).await {
            Ok(response) => {
                debug!(
                    host = %self.host,
                    code = %response.code(),
                    "SMTP server accepted message"
                );
                Ok(())
            }
            Err(e) => {
                warn!(host = %self.host, port = self.port, error = %e, "SMTP send failed");
                Err(map_smtp_error(&e))
            }
        }
    }

    async fn test_connection(&self) -> Result<bool, TransportError> {
        self.inner
            .test_connection()
            .await
            .map_err(|e| map_smtp_error(&e))
    }
}

fn map_smtp_error(err: &lettre::transport::smtp::Error) -> TransportError {
    match err.status() {
        Some(code) => TransportError::rejected(
            code.to_string().parse().unwrap_or_default(),
            err.to_string(),
        ),
        None => TransportError::Connection(err.to_string()),
    }
}

fn lettre_address(address: &Address) -> Result<lettre::Address, TransportError> {
    address
        .as_str()
        .parse()
        .map_err(|e| TransportError::Message(format!("Invalid address '{address}': {e}")))
}

fn lettre_mailbox(mailbox: &Mailbox) -> Result<lettre::message::Mailbox, TransportError> {
    Ok(lettre::message::Mailbox::new(
        mailbox.name.clone(),
        lettre_address(&mailbox.address)?,
    ))
}

/// Converts a message into `lettre`'s representation.
///
/// Bcc recipients end up in the envelope only; `lettre` strips the header.
fn build_message(message: &OutgoingMessage) -> Result<lettre::Message, TransportError> {
    let mut builder = lettre::Message::builder()
        .from(lettre_mailbox(&message.from)?)
        .subject(message.subject.clone());

    for address in &message.to {
        builder = builder.to(lettre::message::Mailbox::new(None, lettre_address(address)?));
    }
    for address in &message.cc {
        builder = builder.cc(lettre::message::Mailbox::new(None, lettre_address(address)?));
    }
    for address in &message.bcc {
        builder = builder.bcc(lettre::message::Mailbox::new(None, lettre_address(address)?));
    }

    let content_type = match message.body.subtype {
        Subtype::Plain => ContentType::TEXT_PLAIN,
        Subtype::Html => ContentType::TEXT_HTML,
    };

    builder
        .header(content_type)
        .body(message.body.text.clone())
        .map_err(|e| TransportError::Message(e.to_string()))
}
