use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

mod app;
mod commands;
mod theme;

#[derive(Parser)]
#[command(name = "lingopal")]
#[command(about = "Lingopal - English conversation practice with translated replies")]
#[command(version)]
struct Cli {
    /// Send a single message, print the replies and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Path to the JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the conversation history file
    #[arg(long)]
    history: Option<PathBuf>,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Skip translating replies
    #[arg(long)]
    no_translate: bool,

    /// Do not write the history file
    #[arg(long)]
    no_save: bool,

    /// Color theme (dark, light, plain)
    #[arg(long, default_value = "dark")]
    theme: String,

    /// Write a configuration file with default values and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(lingopal_core::config::CONFIG_FILE_NAME));
        if path.exists() {
            bail!("{} already exists; not overwriting", path.display());
        }
        lingopal_core::Settings::default().save_to(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut settings = lingopal_core::Settings::load(cli.config.as_deref());

    if let Some(ref model) = cli.model {
        settings.openai.model = model.clone();
    }
    if let Some(ref history) = cli.history {
        settings.conversation.history_file = history.clone();
    }
    if cli.no_translate {
        settings.conversation.enable_translation = false;
    }
    if cli.no_save {
        settings.conversation.auto_save_history = false;
    }

    if !theme::Theme::all_names().contains(&cli.theme.as_str()) {
        tracing::warn!("Unknown theme `{}`, using dark", cli.theme);
    }
    let theme = theme::Theme::by_name(&cli.theme);
    tracing::debug!("Using {} theme", theme.name);

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&settings, &theme, &prompt).await?;
    } else {
        app::run_repl(&settings, &theme).await?;
    }

    Ok(())
}
