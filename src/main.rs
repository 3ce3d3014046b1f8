use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use perm_registry::config::Config;
use perm_registry::core::ToPublicError;
use perm_registry::utils::logging;
use perm_registry::{CommandSource, PermissionChecker, PermissionLevel, PermissionManager, RegistryError};

#[derive(Parser)]
#[clap(version = "0.1.0", author = "perm-registry developers", about = "Permission level registry")]
struct Cli {
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List players of every permission level
    List {
        /// Only list the given level
        #[clap(short, long)]
        level: Option<String>,
    },
    /// Show the permission level of a player
    Query { player: String },
    /// Set the permission level of a player
    Set { player: String, level: String },
    /// Remove a player from every permission level
    Remove { player: String },
    /// Add a player with the default level if absent
    Touch { player: String },
    /// Show or set the default permission level
    Default { level: Option<String> },
    /// Exit with a non-zero status if the player is below the given level
    Check { player: String, level: String },
}

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            let (code, message) = match err.downcast_ref::<RegistryError>() {
                Some(re) => (re.to_error_code().exit_code(), re.to_public_message()),
                None => (1, err.to_string()),
            };
            log::error!("{}", err);
            eprintln!("Error: {}", message);
            code
        }
    };

    logging::shutdown();
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)
        .map_err(|e| anyhow!("加载配置失败 {}: {}", cli.config, e))?;
    logging::init(&config.log).map_err(|e| anyhow!("日志初始化失败: {}", e))?;

    let mut pm = PermissionManager::from_config(&config)?;

    match cli.command {
        Command::List { level } => {
            let levels: Vec<PermissionLevel> = match level {
                Some(level) => vec![PermissionLevel::from_value(level.as_str()).map_err(RegistryError::from)?],
                None => PermissionLevel::descending().collect(),
            };
            for level in levels {
                let members = pm.get_members(level).map_err(RegistryError::from)?;
                println!("{} ({}): {}", level, level.level(), members.join(", "));
            }
        }
        Command::Query { player } => match pm.get_player_level(&player, false)? {
            Some(level) => println!("{}: {} ({})", player, level, level.level()),
            None => println!("{}: - (default {})", player, pm.get_default_level()),
        },
        Command::Set { player, level } => {
            pm.set_level(&player, level.as_str())?;
            println!("{} -> {}", player, level);
        }
        Command::Remove { player } => {
            pm.remove_member(&player)?;
            println!("{} removed", player);
        }
        Command::Touch { player } => {
            pm.touch_member(&player)?;
        }
        Command::Default { level: None } => {
            println!("{}", pm.get_default_level());
        }
        Command::Default { level: Some(level) } => {
            pm.set_default_level(level.as_str())?;
            println!("default_level -> {}", pm.get_default_level());
        }
        Command::Check { player, level } => {
            let checker = PermissionChecker::new(pm);
            checker.require_permission(&CommandSource::player(player), level.as_str())?;
        }
    }

    Ok(())
}
