#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ResponseMode;
use crate::domain::services::help_text;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = std::env::var("BELULLAMA_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(env!("CARGO_PKG_NAME"));
}

async fn create_config_file(config_file_path_str: &str) -> Result<()> {
    let config_file_path = path::PathBuf::from(config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!(
        "Created default config file at {}",
        config_file_path.display()
    );
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to the debug log file generated when running with environment variable RUST_LOG=belullama")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("BELULLAMA_MODEL")
        .num_args(1)
        .help("The model to chat with. Skips the interactive model selection when set.");
}

fn arg_response_mode() -> Arg {
    return Arg::new(ConfigKey::ResponseMode.to_string())
        .long(ConfigKey::ResponseMode.to_string())
        .env("BELULLAMA_RESPONSE_MODE")
        .num_args(1)
        .help(format!(
            "Whether responses are rendered as they stream in, or all at once behind a spinner. [default: {}]",
            Config::default_value(ConfigKey::ResponseMode)
        ))
        .value_parser(PossibleValuesParser::new(ResponseMode::VARIANTS));
}

fn arg_millis(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(format!("{help} [default: {}]", Config::default_value(key)))
        .global(true);
}

fn subcommand_chat() -> Command {
    return Command::new("chat")
        .about("Start a new chat session.")
        .arg(arg_model())
        .arg(arg_response_mode());
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new(env!("CARGO_PKG_NAME"))
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(arg_model())
        .arg(arg_response_mode())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("BELULLAMA_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default_value(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::OllamaURL.to_string())
                .long(ConfigKey::OllamaURL.to_string())
                .env("BELULLAMA_OLLAMA_URL")
                .num_args(1)
                .help(format!("Ollama API URL of the inference service. [default: {}]", Config::default_value(ConfigKey::OllamaURL)))
                .global(true),
        )
        .arg(arg_millis(
            ConfigKey::HealthCheckTimeout,
            "BELULLAMA_HEALTH_CHECK_TIMEOUT",
            "Time to wait in milliseconds before timing out when checking whether the inference service is reachable.",
        ))
        .arg(arg_millis(
            ConfigKey::GenerateTimeout,
            "BELULLAMA_GENERATE_TIMEOUT",
            "Time to wait in milliseconds for a model response or a model pull before giving up. Streamed responses only give up when no new data arrives for this long.",
        ))
        .arg(arg_millis(
            ConfigKey::SettleDelay,
            "BELULLAMA_SETTLE_DELAY",
            "Time to wait in milliseconds after starting or stopping the service before checking it again.",
        ))
        .arg(arg_millis(
            ConfigKey::TypingDelay,
            "BELULLAMA_TYPING_DELAY",
            "Delay in milliseconds between characters when printing model responses. Set to 0 to disable the typing effect.",
        ))
        .arg(
            Arg::new(ConfigKey::ServiceCommand.to_string())
                .long(ConfigKey::ServiceCommand.to_string())
                .env("BELULLAMA_SERVICE_COMMAND")
                .num_args(1)
                .help(format!("Executable invoked with `start` or `stop` to control the inference service. [default: {}]", Config::default_value(ConfigKey::ServiceCommand)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ServiceLog.to_string())
                .long(ConfigKey::ServiceLog.to_string())
                .env("BELULLAMA_SERVICE_LOG")
                .num_args(1)
                .help(format!("File the service command's output is appended to. [default: {}]", Config::default_value(ConfigKey::ServiceLog)))
                .global(true),
        );
}

/// Parses the command line. Returns the loaded configuration when a chat
/// session should start, `None` when a utility subcommand already ran.
pub async fn parse() -> Result<Option<Config>> {
    return parse_from(build().get_matches()).await;
}

pub async fn parse_from(matches: clap::ArgMatches) -> Result<Option<Config>> {
    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").display());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("chat", subcmd_matches)) => {
            let config = Config::load(build(), vec![&matches, subcmd_matches]).await?;
            return Ok(Some(config));
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", create_matches)) => {
                let config = Config::load(build(), vec![&matches, create_matches]).await?;
                create_config_file(&config.get(ConfigKey::ConfigFile)).await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default_value(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        _ => {
            let config = Config::load(build(), vec![&matches]).await?;
            return Ok(Some(config));
        }
    }
}
