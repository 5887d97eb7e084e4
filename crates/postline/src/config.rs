//! Resolution of the property bag the CLI hands to the client.
//!
//! Order: `--options-file`, else `<config dir>/postline/options.json` if it
//! exists, else `POSTLINE_MAIL_*` environment variables. `--set` entries
//! are applied last.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use postline_mail::options::env_properties;
use postline_mail::{MailClientOptions, Properties, to_properties};
use tracing::debug;

use crate::cli::ConfigArgs;

/// Default options file location.
pub fn default_options_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("postline")
        .join("options.json")
}

/// Loads the property bag described by the CLI flags.
pub async fn resolve_properties(args: &ConfigArgs) -> Result<Properties> {
    let mut props = match &args.options_file {
        Some(path) => read_options_file(path).await?,
        None => {
            let path = default_options_path();
            if path.exists() {
                read_options_file(&path).await?
            } else {
                debug!("No options file, using environment");
                env_properties(|name| std::env::var(name).ok())
            }
        }
    };

    props.merge(&parse_overrides(&args.overrides)?);
    Ok(props)
}

/// Loads typed options described by the CLI flags.
pub async fn resolve_options(args: &ConfigArgs) -> Result<MailClientOptions> {
    let props = resolve_properties(args).await?;
    MailClientOptions::from_properties(&props).context("invalid mail options")
}

async fn read_options_file(path: &Path) -> Result<Properties> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    debug!(path = %path.display(), "Loaded options file");
    to_properties(&value).with_context(|| format!("invalid properties in {}", path.display()))
}

fn parse_overrides(overrides: &[String]) -> Result<Properties> {
    let mut props = Properties::new();
    for raw in overrides {
        let Some((key, value)) = raw.split_once('=') else {
            bail!("override '{raw}' must look like KEY=VALUE");
        };
        props
            .set(key, value)
            .with_context(|| format!("invalid override '{raw}'"))?;
    }
    Ok(props)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("postline-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_overrides() {
        let props = parse_overrides(&[
            "mail.smtp.host=smtp.example.com".to_string(),
            "mail.smtp.auth = true".to_string(),
        ])
        .unwrap();
        assert_eq!(props.get("mail.smtp.host"), Some("smtp.example.com"));
        assert_eq!(props.get("mail.smtp.auth"), Some("true"));
    }

    #[test]
    fn test_parse_overrides_requires_equals() {
        assert!(parse_overrides(&["mail.smtp.host".to_string()]).is_err());
        assert!(parse_overrides(&["=value".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_options_file_with_overrides() {
        let path = temp_file(
            "options.json",
            r#"{"mail.smtp.host": "file.example.com", "mail.smtp.port": 2525}"#,
        );
        let args = ConfigArgs {
            options_file: Some(path.clone()),
            overrides: vec!["mail.smtp.port=2626".to_string()],
        };

        let options = resolve_options(&args).await.unwrap();
        assert_eq!(options.host, "file.example.com");
        assert_eq!(options.port, 2626);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_options_file_must_be_object() {
        let path = temp_file("array.json", r#"["mail.smtp.host"]"#);
        let args = ConfigArgs {
            options_file: Some(path.clone()),
            overrides: Vec::new(),
        };
        assert!(resolve_properties(&args).await.is_err());
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_options_file() {
        let args = ConfigArgs {
            options_file: Some(PathBuf::from("/nonexistent/postline/options.json")),
            overrides: Vec::new(),
        };
        assert!(resolve_properties(&args).await.is_err());
    }
}
