use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use jrw_core::config::{Config, WarnLevel};
use jrw_core::paths;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (defaults merged with jrw.yaml)
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Write a default jrw.yaml if none exists
    Init,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::Init => init(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}

fn init(root: &Path, json: bool) -> anyhow::Result<()> {
    let path = paths::config_path(root);
    let written = Config::init(root)
        .with_context(|| format!("failed to write {}", path.display()))?;

    if json {
        return print_json(&serde_json::json!({
            "path": path,
            "written": written,
        }));
    }
    if written {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists; left unchanged", path.display());
    }
    Ok(())
}
