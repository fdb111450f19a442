use anyhow::Result;
use console::style;

use crate::core::context::AppContext;
use crate::core::terminal::{print_error, print_info, print_success, print_warn};

pub async fn run(ctx: &AppContext, args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        None | Some("list") => list(ctx).await,
        Some("show") => show(ctx, args.get(1)).await,
        Some("delete") => delete(ctx, args.get(1)).await,
        Some("clear") => clear(ctx).await,
        Some(other) => {
            print_error(&format!("Unknown history subcommand: {}", other));
            print_info("Usage: quill history [list|show <id>|delete <id>|clear]");
            Ok(())
        }
    }
}

async fn list(ctx: &AppContext) -> Result<()> {
    let summaries = ctx.history.summaries().await?;
    if summaries.is_empty() {
        print_info("History is empty. Generate a report first.");
        return Ok(());
    }
    for summary in summaries {
        println!(
            " {}  {}  {} ({} sections)",
            style(summary.id).cyan(),
            style(summary.created_at.format("%Y-%m-%d %H:%M")).dim(),
            style(&summary.topic).bold(),
            summary.section_count
        );
    }
    Ok(())
}

fn parse_id(arg: Option<&String>) -> Option<i64> {
    arg.and_then(|a| a.parse().ok())
}

async fn show(ctx: &AppContext, id: Option<&String>) -> Result<()> {
    let Some(id) = parse_id(id) else {
        print_error("Usage: quill history show <id>");
        return Ok(());
    };
    let Some(report) = ctx.history.load_by_id(id).await? else {
        print_error(&format!("No report with id {}", id));
        return Ok(());
    };

    println!("\n {}", style(&report.topic).bold().underlined());
    println!(
        " {}\n",
        style(report.created_at.format("%Y-%m-%d %H:%M UTC")).dim()
    );
    for (i, section) in report.sections.iter().enumerate() {
        println!(" {}. {}", i + 1, style(&section.title).bold());
        println!("{}\n", section.content);
        if section.is_placeholder {
            print_warn("This section uses a placeholder image.");
            if let Some(prompt) = &section.image_prompt {
                print_info(&format!("Attempted image prompt: {}", prompt));
            }
        }
    }
    Ok(())
}

async fn delete(ctx: &AppContext, id: Option<&String>) -> Result<()> {
    let Some(id) = parse_id(id) else {
        print_error("Usage: quill history delete <id>");
        return Ok(());
    };
    if ctx.history.delete_by_id(id).await? {
        print_success(&format!("Deleted report {}", id));
    } else {
        print_error(&format!("No report with id {}", id));
    }
    Ok(())
}

async fn clear(ctx: &AppContext) -> Result<()> {
    let confirmed = inquire::Confirm::new("Delete the entire report history?")
        .with_default(false)
        .with_help_message("This cannot be undone")
        .prompt()
        .unwrap_or(false);
    if !confirmed {
        print_info("Cancelled.");
        return Ok(());
    }
    let removed = ctx.history.clear().await?;
    print_success(&format!("Removed {} report(s)", removed));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id(Some(&"1722000000000".to_string())), Some(1722000000000));
        assert_eq!(parse_id(Some(&"abc".to_string())), None);
        assert_eq!(parse_id(None), None);
    }
}
