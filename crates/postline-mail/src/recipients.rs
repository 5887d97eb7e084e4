//! Recipient input and its split into To/Cc/Bcc.
//!
//! Callers may pass recipients in three shapes, mirroring what a loosely
//! typed caller would send as JSON:
//!
//! - a single address string (treated as To),
//! - a list of address strings (treated as To),
//! - an object keyed by `to`, `cc` and `bcc`, each one-or-many.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Role of a recipient in the message envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    /// Primary recipient.
    To,
    /// Carbon copy.
    Cc,
    /// Blind carbon copy.
    Bcc,
}

impl RecipientType {
    /// All recipient types in header order.
    pub const ALL: [Self; 3] = [Self::To, Self::Cc, Self::Bcc];

    /// Lowercase name of the recipient type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::To => "to",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
        }
    }
}

impl fmt::Display for RecipientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipientType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "to" => Ok(Self::To),
            "cc" => Ok(Self::Cc),
            "bcc" => Ok(Self::Bcc),
            _ => Err(Error::InvalidRecipientType(s.to_string())),
        }
    }
}

/// One address or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single address.
    One(String),
    /// A list of addresses.
    Many(Vec<String>),
}

impl OneOrMany {
    fn as_slice(&self) -> &[String] {
        match self {
            Self::One(one) => std::slice::from_ref(one),
            Self::Many(many) => many,
        }
    }
}

/// Recipients grouped explicitly by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientMap {
    /// To recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<OneOrMany>,
    /// Cc recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<OneOrMany>,
    /// Bcc recipients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<OneOrMany>,
}

impl RecipientMap {
    /// Returns the entry for one recipient type.
    #[must_use]
    pub const fn get(&self, kind: RecipientType) -> Option<&OneOrMany> {
        match kind {
            RecipientType::To => self.to.as_ref(),
            RecipientType::Cc => self.cc.as_ref(),
            RecipientType::Bcc => self.bcc.as_ref(),
        }
    }
}

/// Recipient input accepted by [`MailClient::send`](crate::MailClient::send).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    /// A single To address.
    One(String),
    /// A list of To addresses.
    List(Vec<String>),
    /// Addresses grouped by type.
    ByType(RecipientMap),
}

impl Default for Recipients {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Recipients {
    /// Builder-style constructor for typed recipients.
    #[must_use]
    pub fn by_type() -> Self {
        Self::ByType(RecipientMap::default())
    }

    /// Adds an address of the given type, converting the input to
    /// [`Recipients::ByType`] if needed.
    #[must_use]
    pub fn with(self, kind: RecipientType, address: impl Into<String>) -> Self {
        let mut map = match self {
            Self::ByType(map) => map,
            Self::One(one) => RecipientMap {
                to: Some(OneOrMany::One(one)),
                ..RecipientMap::default()
            },
            Self::List(list) => RecipientMap {
                to: (!list.is_empty()).then_some(OneOrMany::Many(list)),
                ..RecipientMap::default()
            },
        };

        let slot = match kind {
            RecipientType::To => &mut map.to,
            RecipientType::Cc => &mut map.cc,
            RecipientType::Bcc => &mut map.bcc,
        };
        let address = address.into();
        *slot = Some(match slot.take() {
            None => OneOrMany::One(address),
            Some(OneOrMany::One(first)) => OneOrMany::Many(vec![first, address]),
            Some(OneOrMany::Many(mut many)) => {
                many.push(address);
                OneOrMany::Many(many)
            }
        });

        Self::ByType(map)
    }
}

impl From<&str> for Recipients {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for Recipients {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for Recipients {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for Recipients {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Recipients {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

impl From<RecipientMap> for Recipients {
    fn from(value: RecipientMap) -> Self {
        Self::ByType(value)
    }
}

/// Extracts the addresses of one recipient type.
///
/// A bare string or list only ever yields To recipients. Entries are
/// trimmed and blank entries dropped; nothing is validated here.
#[must_use]
pub fn parse_recipients(recipients: &Recipients, kind: RecipientType) -> Vec<String> {
    let raw: &[String] = match recipients {
        Recipients::One(one) if kind == RecipientType::To => std::slice::from_ref(one),
        Recipients::List(list) if kind == RecipientType::To => list,
        Recipients::ByType(map) => map.get(kind).map_or(&[][..], OneOrMany::as_slice),
        Recipients::One(_) | Recipients::List(_) => &[],
    };

    raw.iter()
        .map(|addr| addr.trim())
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}
