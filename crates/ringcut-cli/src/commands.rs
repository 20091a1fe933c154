use anyhow::Context;
use colored::Colorize;
use ringcut_server::{RingcutServer, ServerConfig};
use ringcut_types::ContentHash;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Config(args) => cmd_config(args),
        Command::Hash(args) => cmd_hash(args),
    }
}

/// Resolve the effective configuration from every source.
pub fn resolve_config<F>(args: &ConfigArgs, env: F) -> anyhow::Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let mut config = base.with_env(env)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = &args.storage_root {
        config.storage_root = root.clone();
    }
    if let Some(program) = &args.ffmpeg {
        config.transcoder.program = program.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.transcoder.timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.config, process_env)?;
    tracing::debug!(?config, "resolved configuration");
    let server = RingcutServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args, process_env)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_hash(args: HashArgs) -> anyhow::Result<()> {
    if args.paths.is_empty() {
        anyhow::bail!("no files given");
    }
    for path in &args.paths {
        let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let hash = ContentHash::of(&data);
        println!("{}  {}", hash.to_hex().yellow(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_sources() {
        let config = resolve_config(&ConfigArgs::default(), no_env).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn flags_beat_env_beat_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ringcut.toml");
        std::fs::write(
            &file,
            "bind_addr = \"127.0.0.1:7000\"\nstorage_root = \"/from/file\"\n\n[transcoder]\ntimeout_secs = 10\n",
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(file),
            timeout_secs: Some(99),
            ..ConfigArgs::default()
        };
        let env = |key: &str| match key {
            "STORAGE_PATH" => Some("/from/env".to_string()),
            "RINGCUT_TRANSCODE_TIMEOUT_SECS" => Some("50".to_string()),
            _ => None,
        };
        let config = resolve_config(&args, env).unwrap();
        assert_eq!(config.bind_addr.port(), 7000);
        assert_eq!(config.storage_root, PathBuf::from("/from/env"));
        assert_eq!(config.transcoder.timeout_secs, 99);
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        let args = ConfigArgs {
            timeout_secs: Some(0),
            ..ConfigArgs::default()
        };
        assert!(resolve_config(&args, no_env).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/ringcut.toml")),
            ..ConfigArgs::default()
        };
        assert!(resolve_config(&args, no_env).is_err());
    }
}
