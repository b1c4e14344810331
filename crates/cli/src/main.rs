mod config;
mod error;
mod prompt;

use std::path::PathBuf;
use std::sync::Arc;

use arcade::ClientBuilder;
use clap::{Parser, Subcommand};
use runtime::{
    Agent, Console, ConsoleApprover, ConsoleHooks, HistoryChat, OpenAiBackend, RunContext, Runner,
    SessionChat, SessionRunner, StdConsole, ToolService, authorize_all, conversation, gate_tools,
    load_tools,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use config::{ArcadeSettings, Config, Settings};
use error::Result;
use prompt::{AGENT_NAME, APP_NAME, HOOKS_DISPLAY_NAME, INSTRUCTIONS};

const DESCRIPTION_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Notion agent with human-in-the-loop tool confirmation", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ./quill.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat, replaying the full history each turn
    Chat,
    /// Chat through an in-memory session
    Session,
    /// List the available tools and which need confirmation
    Tools,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv_override().ok();
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::discover(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => cmd_chat(&Settings::from_env(config)?).await,
        Commands::Session => cmd_session(&Settings::from_env(config)?).await,
        Commands::Tools => cmd_tools(&ArcadeSettings::from_env(config)?).await,
    }
}

async fn cmd_chat(settings: &Settings) -> Result<()> {
    let console: Arc<dyn Console> = Arc::new(StdConsole::new());
    let agent = build_agent(settings, &console).await?;
    let backend = build_backend(settings);
    print_banner(&backend);

    let ctx = RunContext::new(&settings.user_id);
    let mut chat = HistoryChat::new(Runner::new(backend), agent, ctx, Arc::clone(&console));
    conversation::run(&mut chat, console.as_ref(), "You: ").await?;
    Ok(())
}

async fn cmd_session(settings: &Settings) -> Result<()> {
    let console: Arc<dyn Console> = Arc::new(StdConsole::new());
    let agent = build_agent(settings, &console).await?;
    let backend = build_backend(settings);
    print_banner(&backend);

    let runner = SessionRunner::new(APP_NAME, Runner::new(backend), agent);
    let mut chat = SessionChat::new(runner, &settings.user_id, Arc::clone(&console));
    conversation::run(&mut chat, console.as_ref(), "User: ").await?;
    Ok(())
}

async fn cmd_tools(settings: &ArcadeSettings) -> Result<()> {
    let service = tool_service(settings)?;
    let tools = load_tools(&service, &settings.toolkits, &settings.tools, settings.limit).await?;

    if tools.is_empty() {
        println!("No tools found.");
        return Ok(());
    }

    println!("{:<48}  {:<7}  DESCRIPTION", "TOOL", "CONFIRM");
    println!("{}", "-".repeat(80));

    for tool in &tools {
        let confirm = if settings.policy.check(tool.name()).needs_confirmation() {
            "yes"
        } else {
            "no"
        };
        let description = summarize(&tool.spec().description);
        println!("{:<48}  {confirm:<7}  {description}", tool.name());
    }

    Ok(())
}

/// Fetch, authorize and gate the tools, then bind them into the agent.
async fn build_agent(settings: &Settings, console: &Arc<dyn Console>) -> Result<Agent> {
    let arcade = &settings.arcade;
    let service = tool_service(arcade)?;
    let tools = load_tools(&service, &arcade.toolkits, &arcade.tools, arcade.limit).await?;
    authorize_all(service.as_ref(), &tools, &settings.user_id, console.as_ref()).await?;

    let approver = Arc::new(ConsoleApprover::new(Arc::clone(console)));
    let tools = gate_tools(tools, &arcade.policy, approver);
    info!(tools = tools.len(), "agent tools ready");

    let hooks = Arc::new(ConsoleHooks::new(HOOKS_DISPLAY_NAME, Arc::clone(console)));
    Ok(Agent::new(AGENT_NAME, INSTRUCTIONS)
        .with_tools(tools)
        .with_hooks(hooks))
}

fn tool_service(settings: &ArcadeSettings) -> Result<Arc<dyn ToolService>> {
    let client = ClientBuilder::new(&settings.api_key)
        .base_url(&settings.base_url)
        .build()?;
    Ok(Arc::new(client))
}

fn build_backend(settings: &Settings) -> OpenAiBackend {
    let mut builder = OpenAiBackend::builder(&settings.openai_api_key, &settings.model)
        .base_url(&settings.openai_base_url);
    if let Some(max_tokens) = settings.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    builder.build()
}

fn print_banner(backend: &OpenAiBackend) {
    println!("quill v{} ({backend})", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or Ctrl+D to quit.\n");
}

/// First line of a description, cut to the table width.
fn summarize(description: &str) -> String {
    let line = description.lines().next().unwrap_or_default();
    if line.chars().count() > DESCRIPTION_WIDTH {
        let cut: String = line.chars().take(DESCRIPTION_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_keeps_short_first_line() {
        assert_eq!(summarize("Create a page.\nMore detail."), "Create a page.");
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn summarize_truncates_long_lines() {
        let long = "x".repeat(100);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), DESCRIPTION_WIDTH);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn chat_is_the_default_command() {
        let cli = Cli::try_parse_from(["quill"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["quill", "session", "--config", "x.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Session)));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
