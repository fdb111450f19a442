use anyhow::Result;

use crate::core::context::AppContext;
use crate::core::terminal::{print_error, print_info, print_success};

pub async fn run(ctx: &AppContext, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("set") => set(ctx, args.get(1)).await,
        Some("show") | None => show(ctx).await,
        Some("clear") => clear(ctx).await,
        Some(other) => {
            print_error(&format!("Unknown key subcommand: {}", other));
            print_info("Usage: quill key [set [value]|show|clear]");
            Ok(())
        }
    }
}

async fn set(ctx: &AppContext, value: Option<&String>) -> Result<()> {
    let value = match value {
        Some(v) => v.clone(),
        None => inquire::Password::new("API credential:")
            .without_confirmation()
            .prompt()?,
    };
    if value.trim().is_empty() {
        print_error("Credential must not be empty.");
        return Ok(());
    }
    ctx.vault.set_override(value.trim()).await?;
    print_success("Credential stored. It takes precedence over QUILL_API_KEY.");
    Ok(())
}

async fn show(ctx: &AppContext) -> Result<()> {
    match ctx.vault.get_override().await? {
        Some(value) => {
            let tail: String = value
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            print_info(&format!("Override credential configured (••••{})", tail));
        }
        None if ctx.resolver.is_configured().await => {
            print_info("Using the QUILL_API_KEY environment default.");
        }
        None => {
            print_error("No credential configured. Run `quill key set` or export QUILL_API_KEY.");
        }
    }
    Ok(())
}

async fn clear(ctx: &AppContext) -> Result<()> {
    if ctx.vault.clear_override().await? {
        print_success("Credential override removed.");
    } else {
        print_info("No credential override was stored.");
    }
    Ok(())
}
