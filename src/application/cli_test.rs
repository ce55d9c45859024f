use anyhow::Result;

use super::build;
use super::parse_from;
use crate::configuration::ConfigKey;

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[tokio::test]
async fn it_starts_chat_by_default() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "belullama-chat",
        "-c",
        "./test/does-not-exist.toml",
        "--settle-delay",
        "0",
    ])?;
    let config = parse_from(matches).await?.unwrap();

    assert_eq!(config.get(ConfigKey::SettleDelay), "0");

    return Ok(());
}

#[tokio::test]
async fn it_starts_chat_with_subcommand_arguments() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "belullama-chat",
        "chat",
        "-c",
        "./test/does-not-exist.toml",
        "-m",
        "llama3",
        "--response-mode",
        "batch",
        "--ollama-url",
        "http://127.0.0.1:8080",
    ])?;
    let config = parse_from(matches).await?.unwrap();

    assert_eq!(config.get(ConfigKey::Model), "llama3");
    assert_eq!(config.get(ConfigKey::ResponseMode), "batch");
    assert_eq!(config.get(ConfigKey::OllamaURL), "http://127.0.0.1:8080");

    return Ok(());
}

#[test]
fn it_rejects_unknown_response_modes() {
    let res = build().try_get_matches_from(vec![
        "belullama-chat",
        "--response-mode",
        "streaming",
    ]);
    assert!(res.is_err());
}

#[tokio::test]
async fn it_does_not_chat_for_utility_subcommands() -> Result<()> {
    let matches = build().try_get_matches_from(vec!["belullama-chat", "config", "path"])?;
    let res = parse_from(matches).await?;
    assert!(res.is_none());

    return Ok(());
}

#[test]
fn it_documents_what_the_generate_timeout_bounds() {
    let cmd = build();
    let help = cmd
        .get_arguments()
        .find(|arg| return arg.get_long() == Some("generate-timeout"))
        .and_then(|arg| return arg.get_help())
        .map(|help| return help.to_string())
        .unwrap_or_default();

    assert!(help.contains("model pull"));
    assert!(help.contains("no new data arrives"));
    assert!(help.ends_with("[default: 240000]"));
}
