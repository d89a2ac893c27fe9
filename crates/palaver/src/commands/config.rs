//! Config command - configuration management.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Show which config files are loaded and their precedence
    Which,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./palaver.toml) instead of user config
        #[arg(long)]
        local: bool,
    },

    /// Show configuration file path
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Which => cmd_which(ctx),
        ConfigCommand::Init { local } => cmd_init(local),
        ConfigCommand::Path => cmd_path(),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = &ctx.config;
    let config = &loaded.config;
    let session = config.session();
    let chat = config.chat();
    let logging = config.logging();

    if ctx.json_output {
        let effective = palaver_config::PalaverConfig {
            session: Some(session),
            chat: Some(chat),
            logging: Some(logging),
        };
        println!("{}", serde_json::to_string_pretty(&effective)?);
        return Ok(());
    }

    println!("# Palaver Configuration\n");

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    println!("Session:");
    println!("  ttl: {}s", session.ttl_secs);
    println!("  sweep interval: {}s", session.sweep_interval_secs);
    println!();

    println!("Chat:");
    println!("  model: {}", chat.model);
    println!("  room name words: {}", chat.room_name_words);
    println!();

    println!("Logging:");
    println!("  level: {}", logging.level);
    println!("  json file: {}", logging.json_file);
    if let Some(ref dir) = logging.directory {
        println!("  directory: {}", dir.display());
    }
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = config.to_toml() {
            println!("{}", toml_str);
        }
    }

    Ok(())
}

fn cmd_which(ctx: &Context) -> Result<()> {
    let loaded = &ctx.config;

    println!("Config file search order (later overrides earlier):\n");

    for source in &loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!("  {} {}", status, source.path.display());
    }

    println!();
    let loaded_count = loaded.loaded_from().len();
    if loaded_count == 0 {
        println!("No config files found. Run 'palaver config init' to create one.");
    } else {
        println!("{} config file(s) loaded.", loaded_count);
    }

    Ok(())
}

fn cmd_init(local: bool) -> Result<()> {
    let path = if local {
        PathBuf::from(palaver_config::PROJECT_CONFIG_FILE)
    } else {
        let path = palaver_config::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        path
    };

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    std::fs::write(&path, TEMPLATE)?;
    println!("✓ Created {}", path.display());
    Ok(())
}

fn cmd_path() -> Result<()> {
    match palaver_config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => println!("Could not determine config directory"),
    }
    Ok(())
}

const TEMPLATE: &str = r#"# Palaver Configuration

# Conversation cache
[session]
# Seconds a conversation may sit idle before it is evicted
ttl_secs = 1800
# Seconds between reclaimer sweeps
sweep_interval_secs = 60

[chat]
model = "echo"
# Words from the opening prompt used to name a new chat room
room_name_words = 10

[logging]
level = "info"
json_file = true
# directory = "/var/log/palaver"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = palaver_config::PalaverConfig::from_toml(TEMPLATE).unwrap();
        assert_eq!(config.session(), palaver_config::SessionConfig::default());
        assert_eq!(config.chat(), palaver_config::ChatConfig::default());
        assert_eq!(config.logging(), palaver_config::LoggingConfig::default());
    }
}
