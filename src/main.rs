//! tooldesk - main entry point.
//!
//! Without a subcommand it starts the interactive console. The one-shot
//! subcommands go through the same shell, so they print the same status
//! messages the console would show.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use tooldesk::client::HttpToolClient;
use tooldesk::console::render::{render_status, render_tool_list, render_tool_summary};
use tooldesk::console::{Console, OpenApiToolForm, PythonToolForm, ToolShell};
use tooldesk::Config;

#[derive(Parser, Debug)]
#[command(name = "tooldesk", author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and TOOLDESK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive console (default)
    Console,
    /// Print the registered tools
    List {
        /// One line per tool
        #[arg(long)]
        brief: bool,
    },
    /// Register a tool from a Python source file
    AddPython {
        /// Function name to register under
        #[arg(short, long)]
        name: String,
        /// Python source file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Register a tool from an OpenAPI JSON document
    AddOpenapi {
        /// OpenAPI JSON file
        #[arg(short, long)]
        spec: PathBuf,
        /// Operation to register; the first one in the spec when omitted
        #[arg(short, long)]
        operation_id: Option<String>,
    },
    /// Delete a tool by name
    Delete {
        name: String,
    },
}

fn load_config(cli: &Cli) -> tooldesk::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut config = config.with_env_overrides()?;
    if let Some(url) = &cli.api_url {
        config.client.api_url = url.clone();
    }
    if cli.json_logs {
        config.observability.json_logs = true;
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tooldesk::observability::init_tracing(&config.observability);
    tracing::debug!(api_url = %config.client.api_url, "configuration loaded");

    let api = HttpToolClient::new(&config.client)?;

    let command = cli.command.unwrap_or(Command::Console);
    if let Command::Console = command {
        let mut console = Console::new(api, &config.console);
        let stdin = BufReader::new(tokio::io::stdin());
        tokio::select! {
            result = console.run(stdin, tokio::io::stdout()) => result?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                tracing::debug!("interrupted");
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut shell = ToolShell::new(api, &config.console);
    let ok = match command {
        Command::Console => true,
        Command::List { brief } => {
            let ok = shell.refresh().await.is_ok();
            if ok {
                let text = if brief {
                    render_tool_summary(shell.tools())
                } else {
                    render_tool_list(shell.tools())
                };
                print!("{}", text);
            }
            ok
        }
        Command::AddPython { name, file } => {
            let code = tokio::fs::read_to_string(&file).await?;
            let mut form = PythonToolForm::new(name, code);
            report_form_error(form.submit(&mut shell).await.is_ok(), form.error(), &shell)
        }
        Command::AddOpenapi { spec, operation_id } => {
            let text = tokio::fs::read_to_string(&spec).await?;
            let mut form = OpenApiToolForm::new(text, operation_id.unwrap_or_default());
            report_form_error(form.submit(&mut shell).await.is_ok(), form.error(), &shell)
        }
        Command::Delete { name } => shell.delete_tool(&name).await.is_ok(),
    };

    if let Some(status) = shell.status() {
        if ok {
            println!("{}", render_status(status));
        } else {
            eprintln!("{}", render_status(status));
        }
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Local form errors (bad JSON, blank fields) never reach the banner.
fn report_form_error<A: tooldesk::client::ToolApi>(
    ok: bool,
    form_error: Option<&str>,
    shell: &ToolShell<A>,
) -> bool {
    if !ok && shell.status().is_none() {
        if let Some(err) = form_error {
            eprintln!("[error] {}", err);
        }
    }
    ok
}
