//! Outgoing message model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::address::{Address, Mailbox};
use crate::error::{Error, Result};
use crate::recipients::{RecipientType, Recipients, parse_recipients};

/// Format of the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    /// `text/plain`.
    #[default]
    Plain,
    /// `text/html`.
    Html,
}

impl Subtype {
    /// Returns the MIME subtype name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Html => "html",
        }
    }

    /// Returns the full content type, including charset.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Plain => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subtype {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "plain" | "text/plain" => Ok(Self::Plain),
            "html" | "text/html" => Ok(Self::Html),
            _ => Err(Error::UnsupportedSubtype(s.to_string())),
        }
    }
}

/// Message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// Body content.
    pub text: String,
    /// How `text` is to be interpreted.
    pub subtype: Subtype,
}

/// A validated email message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Sender.
    pub from: Mailbox,
    /// To recipients.
    pub to: Vec<Address>,
    /// CC recipients.
    pub cc: Vec<Address>,
    /// BCC recipients. Never rendered into headers.
    pub bcc: Vec<Address>,
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: Body,
}

impl OutgoingMessage {
    /// Creates a message with no recipients.
    #[must_use]
    pub fn new(from: Mailbox, subject: impl Into<String>, body: Body) -> Self {
        Self {
            from,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: subject.into(),
            body,
        }
    }

    /// Builds a message from loosely typed input, validating every address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] for a malformed sender or recipient
    /// and [`Error::NoRecipients`] if no recipient of any type remains.
    pub fn compose(
        from: &str,
        recipients: &Recipients,
        subject: impl Into<String>,
        text: impl Into<String>,
        subtype: Subtype,
    ) -> Result<Self> {
        let from = Mailbox::parse(from)?;
        let body = Body {
            text: text.into(),
            subtype,
        };
        let mut message = Self::new(from, subject, body);

        for kind in RecipientType::ALL {
            for raw in parse_recipients(recipients, kind) {
                message.push(kind, Address::new(raw)?);
            }
        }

        if message.recipient_count() == 0 {
            return Err(Error::NoRecipients);
        }

        Ok(message)
    }

    /// Adds a recipient of the given type.
    pub fn push(&mut self, kind: RecipientType, address: Address) {
        match kind {
            RecipientType::To => self.to.push(address),
            RecipientType::Cc => self.cc.push(address),
            RecipientType::Bcc => self.bcc.push(address),
        }
    }

    /// Adds a To recipient.
    #[must_use]
    pub fn to(mut self, address: Address) -> Self {
        self.to.push(address);
        self
    }

    /// Adds a CC recipient.
    #[must_use]
    pub fn cc(mut self, address: Address) -> Self {
        self.cc.push(address);
        self
    }

    /// Adds a BCC recipient.
    #[must_use]
    pub fn bcc(mut self, address: Address) -> Self {
        self.bcc.push(address);
        self
    }

    /// Returns all envelope recipients (to, cc, bcc).
    pub fn all_recipients(&self) -> impl Iterator<Item = &Address> {
        self.to.iter().chain(&self.cc).chain(&self.bcc)
    }

    /// Total number of envelope recipients.
    #[must_use]
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}
