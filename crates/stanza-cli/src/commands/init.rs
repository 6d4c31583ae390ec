//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "stanza.toml";

const DEFAULT_CONFIG: &str = r#"# stanza configuration

# "recommended" (default) or "all"
preset = "recommended"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.statement-grouping]
# severity = "error"
loggers = ["console", "logger"]
test_callees = ["it", "describe", "test"]

# Not part of the recommended preset; enable explicitly.
# [rules.padding-line-between-statements]
# enabled = true
# table = [
#     { blankLine = "always", prev = "*", next = "return" },
#     { blankLine = "never", prev = ["const", "let", "var"], next = ["const", "let", "var"] },
# ]

[rules.no-unused-imports]
enabled = true

[rules.dot-notation]
enabled = true
"#;

/// Runs the init command, writing `stanza.toml` into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: stanza check");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.is_rule_enabled("dot-notation"));
        assert!(config.rule("statement-grouping").is_some());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "# mine\n").unwrap();

        assert!(run(tmp.path(), false).is_err());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap(),
            "# mine\n"
        );

        run(tmp.path(), true).unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap(),
            DEFAULT_CONFIG
        );
    }
}
