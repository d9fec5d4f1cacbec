//! Config command - manage configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use csec_core::models::config::{ENV_LISTING_URL, ENV_OUTPUT_PATH, ENV_OUTPUT_PATH_LEGACY};
use csec_core::{CsecConfig, RecordExtractor};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the stored configuration (defaults when no file exists)
    Show {
        /// Apply environment overrides before printing
        #[arg(long)]
        effective: bool,
    },

    /// Write a default configuration file
    Init {
        /// Where to write it instead of the per-user location
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace a file that is already there
        #[arg(long)]
        force: bool,
    },

    /// Print one value, addressed by a dotted key such as "pdf.row_tolerance"
    Get { key: String },

    /// Change one value; the new value is parsed as JSON, else kept as a string
    Set { key: String, value: String },

    /// Print where the configuration lives and which overrides are active
    Path,
}

pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let store = ConfigFile::user();
    match args.command {
        ConfigCommand::Show { effective } => {
            if !store.path.exists() {
                eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            let mut config = store.load()?;
            if effective {
                config.apply_env();
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { output, force } => {
            let target = output.map(ConfigFile::at).unwrap_or(store);
            if target.path.exists() && !force {
                bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    target.path.display()
                );
            }
            target.store(&CsecConfig::default())?;
            println!("{} Created configuration file at {}", style("✓").green(), target.path.display());
        }
        ConfigCommand::Get { key } => {
            let tree = serde_json::to_value(store.load()?)?;
            println!("{}", serde_json::to_string_pretty(lookup_key(&tree, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let value = parse_value(&value);
            let config = with_key(&store.load()?, &key, value.clone())?;
            // Selectors, target label and origin must still compile.
            RecordExtractor::new(&config)?;
            store.store(&config)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => describe(&store),
    }
    Ok(())
}

/// Location of the per-user configuration file.
pub fn default_config_path() -> PathBuf {
    ConfigFile::user().path
}

/// A configuration file on disk.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn user() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at(base.join("csec").join("config.json"))
    }

    fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Stored configuration, or defaults when the file is absent.
    fn load(&self) -> anyhow::Result<CsecConfig> {
        if !self.path.exists() {
            return Ok(CsecConfig::default());
        }
        CsecConfig::from_file(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))
    }

    fn store(&self, config: &CsecConfig) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        config
            .save(&self.path)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn lookup_key<'a>(tree: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.')
        .try_fold(tree, |node, part| node.get(part))
        .ok_or_else(|| anyhow!("Configuration key not found: {}", key))
}

/// Replace an existing leaf. Unknown keys are rejected rather than added.
fn assign_key(tree: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let mut parts = key.split('.').peekable();
    let mut node = tree;
    while let Some(part) = parts.next() {
        let child = node
            .as_object_mut()
            .and_then(|map| map.get_mut(part))
            .ok_or_else(|| anyhow!("Configuration key not found: {}", key))?;
        if parts.peek().is_none() {
            *child = value;
            return Ok(());
        }
        node = child;
    }
    bail!("Configuration key not found: {}", key)
}

/// Copy of `config` with `key` set, checked against the config schema.
fn with_key(config: &CsecConfig, key: &str, value: Value) -> anyhow::Result<CsecConfig> {
    let mut tree = serde_json::to_value(config)?;
    assign_key(&mut tree, key, value)?;
    serde_json::from_value(tree).map_err(|e| anyhow!("Invalid value for {}: {}", key, e))
}

fn describe(store: &ConfigFile) {
    println!("Configuration file: {}", store.path.display());
    if store.path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'csec config init' to create a configuration file.");
    }

    println!();
    println!("Environment overrides:");
    for name in [ENV_LISTING_URL, ENV_OUTPUT_PATH, ENV_OUTPUT_PATH_LEGACY] {
        match std::env::var(name) {
            Ok(v) if !v.trim().is_empty() => println!("  {} = {}", name, v),
            _ => println!("  {} {}", name, style("(unset)").dim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_lookup_key() {
        let tree = json!({"pdf": {"follow_lines": 7}});
        assert_eq!(lookup_key(&tree, "pdf.follow_lines").unwrap(), &json!(7));
        assert_eq!(lookup_key(&tree, "pdf").unwrap(), &json!({"follow_lines": 7}));
        assert!(lookup_key(&tree, "pdf.missing").is_err());
        assert!(lookup_key(&tree, "pdf.follow_lines.deeper").is_err());
    }

    #[test]
    fn test_assign_key_rejects_unknown() {
        let mut tree = json!({"pdf": {"follow_lines": 7}});
        assign_key(&mut tree, "pdf.follow_lines", json!(3)).unwrap();
        assert_eq!(tree, json!({"pdf": {"follow_lines": 3}}));

        assert!(assign_key(&mut tree, "pdf.new_field", json!(1)).is_err());
        assert!(assign_key(&mut tree, "pdf.follow_lines.x", json!(1)).is_err());
        assert_eq!(tree, json!({"pdf": {"follow_lines": 3}}));
    }

    #[test]
    fn test_with_key_checks_types() {
        let config = CsecConfig::default();
        let updated = with_key(&config, "pdf.target_label", parse_value("Sponsor")).unwrap();
        assert_eq!(updated.pdf.target_label, "Sponsor");
        assert!(with_key(&config, "pdf.follow_lines", parse_value("many")).is_err());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("2.5"), json!(2.5));
        assert_eq!(parse_value("false"), json!(false));
        assert_eq!(parse_value("ITSEF"), json!("ITSEF"));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigFile::at(dir.path().join("nested").join("config.json"));
        assert_eq!(store.load().unwrap().pdf.follow_lines, 7);

        let config = with_key(&CsecConfig::default(), "pdf.follow_lines", json!(4)).unwrap();
        store.store(&config).unwrap();
        assert_eq!(store.load().unwrap().pdf.follow_lines, 4);
    }
}
