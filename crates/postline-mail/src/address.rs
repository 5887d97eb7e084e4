//! Email address types.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A validated bare email address (`local@domain`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the address is malformed.
    pub fn new(addr: impl AsRef<str>) -> Result<Self> {
        let addr = addr.as_ref().trim();
        Self::validate(addr).map_err(|reason| Error::InvalidAddress {
            address: addr.to_string(),
            reason,
        })?;
        Ok(Self(addr.to_string()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }

    fn validate(addr: &str) -> std::result::Result<(), &'static str> {
        if addr.is_empty() {
            return Err("address cannot be empty");
        }

        if addr.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
            return Err("address contains whitespace or angle brackets");
        }

        let Some((local, domain)) = addr.split_once('@') else {
            return Err("address must contain @");
        };

        if domain.contains('@') {
            return Err("address must have exactly one @");
        }

        if local.is_empty() || domain.is_empty() {
            return Err("local and domain parts cannot be empty");
        }

        if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
            return Err("domain is malformed");
        }

        // The SMTP transport re-parses every address; anything it would
        // refuse must fail here, before a message is handed over.
        addr.parse::<lettre::Address>()
            .map(drop)
            .map_err(|e| match e {
                lettre::address::AddressError::InvalidUser => "local part is malformed",
                lettre::address::AddressError::InvalidDomain => "domain is malformed",
                _ => "address is malformed",
            })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mailbox (optional display name + address).
///
/// Parses both `user@example.com` and `Jane Doe <user@example.com>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name (optional).
    pub name: Option<String>,
    /// Email address.
    pub address: Address,
}

impl Mailbox {
    /// Creates a new mailbox with just an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn new(address: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            name: None,
            address: Address::new(address)?,
        })
    }

    /// Creates a new mailbox with a display name and address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn with_name(name: impl Into<String>, address: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            name: Some(name.into()),
            address: Address::new(address)?,
        })
    }

    /// Parses a mailbox in either bare or `Name <addr>` form.
    ///
    /// # Errors
    ///
    /// Returns an error if the address part is invalid or the angle
    /// brackets are unbalanced.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let Some(open) = input.rfind('<') else {
            return Self::new(input);
        };

        let Some(rest) = input[open + 1..].strip_suffix('>') else {
            return Err(Error::InvalidAddress {
                address: input.to_string(),
                reason: "unbalanced angle brackets",
            });
        };

        let name = input[..open].trim().trim_matches('"').trim();
        if name.is_empty() {
            Self::new(rest)
        } else {
            Self::with_name(name, rest)
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

impl FromStr for Mailbox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
