//! Subcommand implementations.

use anyhow::{Context, Result};
use postline_mail::{
    MailClient, MailClientOptions, MemoryTransport, RecipientType, Recipients, Subtype, get_client,
};
use tracing::info;

use crate::cli::SendArgs;

/// Builds the recipient input from `--to`, `--cc` and `--bcc`.
fn recipients(args: &SendArgs) -> Recipients {
    let typed = [
        (RecipientType::To, &args.to),
        (RecipientType::Cc, &args.cc),
        (RecipientType::Bcc, &args.bcc),
    ];

    let mut recipients = Recipients::by_type();
    for (kind, addresses) in typed {
        for address in addresses {
            recipients = recipients.with(kind, address.clone());
        }
    }
    recipients
}

async fn body(args: &SendArgs) -> Result<String> {
    match (&args.text, &args.text_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

pub async fn send(options: MailClientOptions, args: SendArgs) -> Result<()> {
    let subtype: Subtype = args.subtype.parse()?;
    let text = body(&args).await?;
    let recipients = recipients(&args);

    if args.dry_run {
        let transport = MemoryTransport::new();
        let client = MailClient::with_transport(options, transport.clone())?;
        client
            .send(&args.from, recipients, &args.subject, &text, subtype)
            .await?;
        if let Some(message) = transport.last() {
            println!("{message:#?}");
        }
        info!("Dry run complete, nothing sent");
        return Ok(());
    }

    let client = get_client(Some(options))?;
    client
        .send(&args.from, recipients, &args.subject, &text, subtype)
        .await
        .context("failed to send mail")?;
    println!("sent");
    Ok(())
}

pub fn properties(options: &MailClientOptions) -> Result<()> {
    let value = options.to_properties().to_value();
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn show_options(options: &MailClientOptions) {
    println!("protocol: {}", options.protocol);
    println!("host:     {}", options.host);
    println!("port:     {}", options.port);
    println!("security: {}", options.security().display_name());
    println!("auth:     {}", options.auth);
    println!("user:     {}", options.user.as_deref().unwrap_or("-"));
    println!("timeout:  {}ms", options.timeout.as_millis());
    for (key, value) in options.extra.iter() {
        println!("extra:    {key}={value}");
    }
}

pub async fn check(options: MailClientOptions) -> Result<()> {
    let host = options.host.clone();
    let client = get_client(Some(options))?;
    if client.test_connection().await? {
        println!("{host}: ok");
        Ok(())
    } else {
        anyhow::bail!("{host}: server did not accept the connection")
    }
}
