//! Typed mail client configuration.
//!
//! [`MailClientOptions`] enumerates every property key the client
//! understands. It is built from a [`Properties`] bag, from a JSON options
//! object, or from the process environment via [`MailClientOptions::load`],
//! and is immutable once handed to a client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::properties::{Properties, to_properties};

/// Property selecting the transport protocol.
pub const PROTOCOL_KEY: &str = "mail.transport.protocol";
/// Property holding the login user.
pub const USER_KEY: &str = "mail.user";
/// Property holding the login password.
pub const PASSWORD_KEY: &str = "mail.password";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variable prefix read by [`MailClientOptions::load`].
pub const ENV_PREFIX: &str = "POSTLINE_MAIL_";

/// Transport protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// SMTP, plaintext or upgraded with STARTTLS.
    #[default]
    Smtp,
    /// SMTP over implicit TLS.
    Smtps,
}

impl Protocol {
    /// Returns the protocol name used in property keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::Smtps => "smtps",
        }
    }

    fn key(self, suffix: &str) -> String {
        format!("mail.{}.{suffix}", self.as_str())
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "smtps" => Ok(Self::Smtps),
            other => Err(Error::invalid_property(
                PROTOCOL_KEY,
                format!("unsupported protocol '{other}'"),
            )),
        }
    }
}

/// Security/encryption mode for connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Security {
    /// No encryption (not recommended).
    #[default]
    None,
    /// Implicit TLS (connect directly with TLS).
    Tls,
    /// STARTTLS upgrade after plaintext connect.
    StartTls,
}

impl Security {
    /// Get display name for the security mode.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::None => "None (insecure)",
            Self::Tls => "SSL/TLS",
            Self::StartTls => "STARTTLS",
        }
    }

    /// Get default port for the security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 25,
            Self::StartTls => 587,
            Self::Tls => 465,
        }
    }
}

/// Mail client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct MailClientOptions {
    /// Transport protocol.
    pub protocol: Protocol,
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Whether to upgrade an `smtp` connection with STARTTLS.
    pub starttls: bool,
    /// Whether to authenticate.
    pub auth: bool,
    /// Username for authentication.
    pub user: Option<String>,
    /// Password for authentication.
    pub password: Option<String>,
    /// Connection timeout.
    pub timeout: Duration,
    /// Properties not recognised above, passed through untouched.
    pub extra: Properties,
}

impl Default for MailClientOptions {
    fn default() -> Self {
        Self {
            protocol: Protocol::Smtp,
            host: DEFAULT_HOST.to_string(),
            port: Security::None.default_port(),
            starttls: false,
            auth: false,
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
            extra: Properties::new(),
        }
    }
}

impl fmt::Debug for MailClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailClientOptions")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("starttls", &self.starttls)
            .field("auth", &self.auth)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("extra", &self.extra)
            .finish()
    }
}

impl MailClientOptions {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> OptionsBuilder {
        OptionsBuilder::new(host)
    }

    /// Effective connection security.
    #[must_use]
    pub const fn security(&self) -> Security {
        match (self.protocol, self.starttls) {
            (Protocol::Smtps, _) => Security::Tls,
            (Protocol::Smtp, true) => Security::StartTls,
            (Protocol::Smtp, false) => Security::None,
        }
    }

    /// Reads options from a property bag, applying defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProperty`] if a recognised key has an
    /// unparseable value.
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let mut rest = props.clone();

        let protocol = match rest.remove(PROTOCOL_KEY) {
            Some(raw) => raw.parse()?,
            None => Protocol::default(),
        };

        let host = rest
            .remove(&protocol.key("host"))
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let auth = take_parsed(&mut rest, &protocol.key("auth"), parse_bool)?.unwrap_or(false);

        let starttls = match protocol {
            Protocol::Smtp => {
                take_parsed(&mut rest, &protocol.key("starttls.enable"), parse_bool)?
                    .unwrap_or(false)
            }
            Protocol::Smtps => false,
        };

        let mut options = Self {
            protocol,
            host,
            port: 0,
            starttls,
            auth,
            user: rest.remove(USER_KEY).filter(|u| !u.is_empty()),
            password: rest.remove(PASSWORD_KEY).filter(|p| !p.is_empty()),
            timeout: take_parsed(&mut rest, &protocol.key("connectiontimeout"), |raw| {
                raw.parse::<u64>().map(Duration::from_millis).ok()
            })?
            .unwrap_or(DEFAULT_TIMEOUT),
            extra: Properties::new(),
        };

        let default_port = options.security().default_port();
        options.port = take_parsed(&mut rest, &protocol.key("port"), |raw| {
            raw.parse::<u16>().ok()
        })?
        .unwrap_or(default_port);

        for (key, _) in rest.iter() {
            debug!(key, "Passing through unrecognised mail property");
        }
        options.extra = rest;

        Ok(options)
    }

    /// Reads options from a JSON options object.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be normalised into properties
    /// or a recognised value is invalid.
    pub fn from_json(options: &Value) -> Result<Self> {
        Self::from_properties(&to_properties(options)?)
    }

    /// Renders the options back into a property bag.
    ///
    /// Recognised keys take precedence over same-named entries in `extra`.
    #[must_use]
    pub fn to_properties(&self) -> Properties {
        let p = self.protocol;
        let mut props = self.extra.clone();

        let mut put = |key: &str, value: &str| {
            let _ = props.set(key, value);
        };
        put(PROTOCOL_KEY, p.as_str());
        put(&p.key("host"), &self.host);
        put(&p.key("port"), &self.port.to_string());
        put(&p.key("auth"), if self.auth { "true" } else { "false" });
        if p == Protocol::Smtp {
            put(
                &p.key("starttls.enable"),
                if self.starttls { "true" } else { "false" },
            );
        }
        put(
            &p.key("connectiontimeout"),
            &self.timeout.as_millis().to_string(),
        );
        if let Some(user) = &self.user {
            put(USER_KEY, user);
        }
        if let Some(password) = &self.password {
            put(PASSWORD_KEY, password);
        }

        props
    }

    /// Loads the default configuration: built-in defaults overlaid with
    /// `POSTLINE_MAIL_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds an invalid value.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load) but reads variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let props = env_properties(lookup);
        debug!(properties = ?props, "Loaded default mail configuration");
        Self::from_properties(&props)
    }

    /// Checks the options for values that cannot work.
    ///
    /// # Errors
    ///
    /// Returns every problem found.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if self.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost);
        }
        if self.port == 0 {
            errors.push(ValidationError::InvalidPort);
        }
        if self.timeout.as_millis() == 0 {
            errors.push(ValidationError::ZeroTimeout);
        } else if whole_millis(self.timeout) != self.timeout {
            errors.push(ValidationError::InvalidTimeout);
        }
        if self.auth {
            if self.user.as_deref().is_none_or(|u| u.trim().is_empty()) {
                errors.push(ValidationError::MissingUser);
            }
            if self.password.as_deref().is_none_or(str::is_empty) {
                errors.push(ValidationError::MissingPassword);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Collects `POSTLINE_MAIL_*` variables into a property bag.
///
/// Variables for the protocol that is not selected are still collected so
/// that they pass through as extra properties.
pub fn env_properties<F>(lookup: F) -> Properties
where
    F: Fn(&str) -> Option<String>,
{
    let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));
    let mut props = Properties::new();
    let mut put = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            let _ = props.set(key, value);
        }
    };

    let protocol = var("TRANSPORT_PROTOCOL");
    let timeout_key = match protocol.as_deref().map(str::parse::<Protocol>) {
        Some(Ok(p)) => p.key("connectiontimeout"),
        _ => Protocol::Smtp.key("connectiontimeout"),
    };

    put(PROTOCOL_KEY, protocol);
    put(USER_KEY, var("USERNAME"));
    put(PASSWORD_KEY, var("PASSWORD"));
    put("mail.smtp.host", var("SMTP_HOST"));
    put("mail.smtp.port", var("SMTP_PORT"));
    put("mail.smtp.auth", var("SMTP_AUTH"));
    put("mail.smtp.starttls.enable", var("SMTP_STARTTLS"));
    put("mail.smtps.host", var("SMTPS_HOST"));
    put("mail.smtps.port", var("SMTPS_PORT"));
    put("mail.smtps.auth", var("SMTPS_AUTH"));
    put(&timeout_key, var("TIMEOUT_MS"));

    props
}

fn take_parsed<T>(
    props: &mut Properties,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    match props.remove(key) {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| Error::invalid_property(key, format!("cannot parse '{raw}'"))),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Rounds `timeout` up to whole milliseconds, the unit of the
/// `connectiontimeout` property.
fn whole_millis(timeout: Duration) -> Duration {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    let partial = timeout.subsec_nanos() % 1_000_000 != 0;
    Duration::from_millis(millis.saturating_add(u64::from(partial)))
}

/// Builder for [`MailClientOptions`].
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    protocol: Protocol,
    host: String,
    port: Option<u16>,
    starttls: bool,
    credentials: Option<(String, String)>,
    timeout: Duration,
    extra: Properties,
}

impl OptionsBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            protocol: Protocol::Smtp,
            host: host.into(),
            port: None,
            starttls: false,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            extra: Properties::new(),
        }
    }

    /// Sets the protocol.
    #[must_use]
    pub const fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enables or disables STARTTLS for `smtp`.
    #[must_use]
    pub const fn starttls(mut self, enabled: bool) -> Self {
        self.starttls = enabled;
        self
    }

    /// Sets login credentials and turns authentication on.
    #[must_use]
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    /// Sets the connection timeout.
    ///
    /// Timeouts are stored in whole milliseconds; any fraction is rounded
    /// up.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = whole_millis(timeout);
        self
    }

    /// Adds a pass-through property.
    #[must_use]
    pub fn property(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let _ = self.extra.set(key, value);
        self
    }

    /// Builds the options.
    #[must_use]
    pub fn build(self) -> MailClientOptions {
        let starttls = self.starttls && self.protocol == Protocol::Smtp;
        let (auth, user, password) = match self.credentials {
            Some((user, password)) => (true, Some(user), Some(password)),
            None => (false, None, None),
        };

        let mut options = MailClientOptions {
            protocol: self.protocol,
            host: self.host,
            port: 0,
            starttls,
            auth,
            user,
            password,
            timeout: self.timeout,
            extra: self.extra,
        };
        let default_port = options.security().default_port();
        options.port = self.port.unwrap_or(default_port);
        options
    }
}

/// Problem found by [`MailClientOptions::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Host is empty.
    EmptyHost,
    /// Port is 0.
    InvalidPort,
    /// Connection timeout is under one millisecond.
    ZeroTimeout,
    /// Connection timeout is not a whole number of milliseconds, or is too
    /// large to express as one.
    InvalidTimeout,
    /// Authentication is on but no user is set.
    MissingUser,
    /// Authentication is on but no password is set.
    MissingPassword,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyHost => "mail host is required",
            Self::InvalidPort => "mail port must be 1-65535",
            Self::ZeroTimeout => "connection timeout must be at least 1ms",
            Self::InvalidTimeout => "connection timeout must be a whole number of milliseconds",
            Self::MissingUser => "mail.user is required when auth is enabled",
            Self::MissingPassword => "mail.password is required when auth is enabled",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating options.
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    mod security_tests {
        use super::*;

        #[test]
        fn default_ports() {
            assert_eq!(Security::None.default_port(), 25);
            assert_eq!(Security::StartTls.default_port(), 587);
            assert_eq!(Security::Tls.default_port(), 465);
        }

        #[test]
        fn display_names() {
            assert_eq!(Security::None.display_name(), "None (insecure)");
            assert_eq!(Security::Tls.display_name(), "SSL/TLS");
            assert_eq!(Security::StartTls.display_name(), "STARTTLS");
        }

        #[test]
        fn derived_from_protocol() {
            let smtps = MailClientOptions::builder("h").protocol(Protocol::Smtps).build();
            assert_eq!(smtps.security(), Security::Tls);
            assert_eq!(smtps.port, 465);

            let starttls = MailClientOptions::builder("h").starttls(true).build();
            assert_eq!(starttls.security(), Security::StartTls);
            assert_eq!(starttls.port, 587);

            let plain = MailClientOptions::builder("h").build();
            assert_eq!(plain.security(), Security::None);
            assert_eq!(plain.port, 25);
        }

        #[test]
        fn starttls_ignored_for_smtps() {
            let options = MailClientOptions::builder("h")
                .protocol(Protocol::Smtps)
                .starttls(true)
                .build();
            assert!(!options.starttls);
            assert_eq!(options.security(), Security::Tls);
        }
    }

    mod properties_tests {
        use super::*;

        #[test]
        fn empty_gives_defaults() {
            let options = MailClientOptions::from_properties(&Properties::new()).unwrap();
            assert_eq!(options, MailClientOptions::default());
        }

        #[test]
        fn smtp_keys() {
            let options = MailClientOptions::from_json(&json!({
                "mail.smtp.host": "smtp.example.com",
                "mail.smtp.auth": true,
                "mail.smtp.starttls.enable": "true",
                "mail.user": "me@example.com",
                "mail.password": "secret",
                "mail.smtp.connectiontimeout": 5000,
            }))
            .unwrap();

            assert_eq!(options.protocol, Protocol::Smtp);
            assert_eq!(options.host, "smtp.example.com");
            assert_eq!(options.port, 587);
            assert_eq!(options.security(), Security::StartTls);
            assert!(options.auth);
            assert_eq!(options.user.as_deref(), Some("me@example.com"));
            assert_eq!(options.password.as_deref(), Some("secret"));
            assert_eq!(options.timeout, Duration::from_millis(5000));
            assert!(options.extra.is_empty());
        }

        #[test]
        fn smtps_keys() {
            let options = MailClientOptions::from_json(&json!({
                "mail.transport.protocol": "smtps",
                "mail.smtps.host": "mail.example.com",
                "mail.smtps.port": "2465",
                "mail.smtp.host": "ignored.example.com",
            }))
            .unwrap();

            assert_eq!(options.protocol, Protocol::Smtps);
            assert_eq!(options.host, "mail.example.com");
            assert_eq!(options.port, 2465);
            assert_eq!(options.security(), Security::Tls);
            assert_eq!(options.extra.get("mail.smtp.host"), Some("ignored.example.com"));
        }

        #[test]
        fn unknown_keys_pass_through() {
            let options = MailClientOptions::from_json(&json!({ "mail.debug": true })).unwrap();
            assert_eq!(options.extra.get("mail.debug"), Some("true"));
            assert_eq!(options.to_properties().get("mail.debug"), Some("true"));
        }

        #[test]
        fn invalid_port() {
            let err = MailClientOptions::from_json(&json!({ "mail.smtp.port": "abc" })).unwrap_err();
            assert!(matches!(err, Error::InvalidProperty { ref key, .. } if key == "mail.smtp.port"));

            let err = MailClientOptions::from_json(&json!({ "mail.smtp.port": 70000 })).unwrap_err();
            assert!(matches!(err, Error::InvalidProperty { .. }));
        }

        #[test]
        fn invalid_bool() {
            let err = MailClientOptions::from_json(&json!({ "mail.smtp.auth": "maybe" })).unwrap_err();
            assert!(matches!(err, Error::InvalidProperty { ref key, .. } if key == "mail.smtp.auth"));
        }

        #[test]
        fn invalid_protocol() {
            let err = MailClientOptions::from_json(&json!({ "mail.transport.protocol": "imap" }))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidProperty { ref key, .. } if key == PROTOCOL_KEY));
        }

        #[test]
        fn round_trip() {
            let options = MailClientOptions::builder("smtp.example.com")
                .starttls(true)
                .credentials("me", "pw")
                .timeout(Duration::from_secs(10))
                .property("mail.debug", "true")
                .build();
            let back = MailClientOptions::from_properties(&options.to_properties()).unwrap();
            assert_eq!(back, options);
        }

        #[test]
        fn builder_rounds_timeout_up() {
            let options = MailClientOptions::builder("h")
                .timeout(Duration::from_micros(1500))
                .build();
            assert_eq!(options.timeout, Duration::from_millis(2));

            let options = MailClientOptions::builder("h")
                .timeout(Duration::from_micros(500))
                .build();
            assert_eq!(options.timeout, Duration::from_millis(1));
            assert!(options.validate().is_ok());

            let back = MailClientOptions::from_properties(&options.to_properties()).unwrap();
            assert_eq!(back, options);
        }

        #[test]
        fn debug_redacts_password() {
            let options = MailClientOptions::builder("h").credentials("me", "hunter2").build();
            let shown = format!("{options:?}");
            assert!(!shown.contains("hunter2"));
            assert!(shown.contains("me"));
        }
    }

    mod env_tests {
        use super::*;

        #[test]
        fn no_vars_gives_defaults() {
            let options = MailClientOptions::from_lookup(lookup(&[])).unwrap();
            assert_eq!(options, MailClientOptions::default());
        }

        #[test]
        fn smtp_vars() {
            let options = MailClientOptions::from_lookup(lookup(&[
                ("POSTLINE_MAIL_SMTP_HOST", "smtp.example.com"),
                ("POSTLINE_MAIL_SMTP_PORT", "2525"),
                ("POSTLINE_MAIL_SMTP_AUTH", "true"),
                ("POSTLINE_MAIL_USERNAME", "me"),
                ("POSTLINE_MAIL_PASSWORD", "pw"),
                ("POSTLINE_MAIL_TIMEOUT_MS", "1500"),
            ]))
            .unwrap();

            assert_eq!(options.host, "smtp.example.com");
            assert_eq!(options.port, 2525);
            assert!(options.auth);
            assert_eq!(options.user.as_deref(), Some("me"));
            assert_eq!(options.timeout, Duration::from_millis(1500));
        }

        #[test]
        fn smtps_vars() {
            let options = MailClientOptions::from_lookup(lookup(&[
                ("POSTLINE_MAIL_TRANSPORT_PROTOCOL", "smtps"),
                ("POSTLINE_MAIL_SMTPS_HOST", "secure.example.com"),
                ("POSTLINE_MAIL_SMTP_HOST", "plain.example.com"),
                ("POSTLINE_MAIL_TIMEOUT_MS", "900"),
            ]))
            .unwrap();

            assert_eq!(options.protocol, Protocol::Smtps);
            assert_eq!(options.host, "secure.example.com");
            assert_eq!(options.port, 465);
            assert_eq!(options.timeout, Duration::from_millis(900));
        }

        #[test]
        fn bad_var_is_error() {
            let result = MailClientOptions::from_lookup(lookup(&[("POSTLINE_MAIL_SMTP_PORT", "x")]));
            assert!(result.is_err());
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            assert!(MailClientOptions::default().validate().is_ok());
        }

        #[test]
        fn collects_all_errors() {
            let mut options = MailClientOptions::default();
            options.host = "  ".into();
            options.port = 0;
            options.auth = true;
            options.timeout = Duration::ZERO;

            let errors = options.validate().unwrap_err();
            assert_eq!(
                errors,
                vec![
                    ValidationError::EmptyHost,
                    ValidationError::InvalidPort,
                    ValidationError::ZeroTimeout,
                    ValidationError::MissingUser,
                    ValidationError::MissingPassword,
                ]
            );
        }

        #[test]
        fn sub_millisecond_timeout_rejected() {
            let options = MailClientOptions {
                timeout: Duration::from_micros(500),
                ..MailClientOptions::default()
            };
            assert_eq!(options.validate(), Err(vec![ValidationError::ZeroTimeout]));

            let options = MailClientOptions {
                timeout: Duration::from_micros(1500),
                ..MailClientOptions::default()
            };
            assert_eq!(options.validate(), Err(vec![ValidationError::InvalidTimeout]));
        }

        #[test]
        fn oversized_timeout_rejected() {
            let options = MailClientOptions {
                timeout: Duration::MAX,
                ..MailClientOptions::default()
            };
            assert_eq!(options.validate(), Err(vec![ValidationError::InvalidTimeout]));
        }

        #[test]
        fn credentials_satisfy_auth() {
            let options = MailClientOptions::builder("h").credentials("me", "pw").build();
            assert!(options.validate().is_ok());
        }
    }

    mod roundtrip_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_options_survive_properties(
                host in "[a-z][a-z0-9-]{0,10}\\.example\\.com",
                smtps in any::<bool>(),
                port in proptest::option::of(1u16..),
                starttls in any::<bool>(),
                credentials in proptest::option::of(("[a-z0-9]{1,8}", "[a-zA-Z0-9!#]{1,12}")),
                timeout_micros in 1u64..10_000_000_000,
            ) {
                let protocol = if smtps { Protocol::Smtps } else { Protocol::Smtp };
                let mut builder = MailClientOptions::builder(host)
                    .protocol(protocol)
                    .starttls(starttls)
                    .timeout(Duration::from_micros(timeout_micros));
                if let Some(port) = port {
                    builder = builder.port(port);
                }
                if let Some((user, password)) = credentials {
                    builder = builder.credentials(user, password);
                }
                let options = builder.build();

                prop_assert!(options.validate().is_ok());
                let back = MailClientOptions::from_properties(&options.to_properties()).unwrap();
                prop_assert_eq!(back, options);
            }
        }
    }
}
