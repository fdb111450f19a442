mod generate;
mod history;
mod key;
mod serve;

use anyhow::Result;
use console::style;

use crate::core::context::AppContext;
use crate::core::terminal::{self, GuideSection};

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Reports")
        .command("generate <topic>", "Generate a new illustrated report")
        .command("history", "List previously generated reports")
        .command("history show <id>", "Print one stored report")
        .command("history delete <id>", "Delete one stored report")
        .command("history clear", "Delete the entire history")
        .print();

    GuideSection::new("Configuration")
        .command("key set [value]", "Store a personal API credential")
        .command("key show", "Show the credential status (masked)")
        .command("key clear", "Remove the stored credential override")
        .print();

    GuideSection::new("Service")
        .command("serve", "Start the local HTTP API")
        .print();

    println!(
        " {} {} generate \"The History of Cartography\" --length long --contributors\n",
        style("Example:").bold(),
        style("quill").green()
    );
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    if matches!(command, "help" | "--help" | "-h") {
        print_help();
        return Ok(());
    }

    let ctx = AppContext::init(AppContext::default_data_dir()).await?;

    match command {
        "generate" => generate::run(&ctx, &args[2..]).await,
        "history" => history::run(&ctx, &args[2..]).await,
        "key" => key::run(&ctx, &args[2..]).await,
        "serve" => serve::run(&ctx, &args[2..]).await,
        unknown => {
            terminal::print_error(&format!("Unknown command: {}", unknown));
            print_help();
            Ok(())
        }
    }
}

/// Pull the value following a flag, if any.
pub(crate) fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
