//! Print the default grade configuration.
//!
//! The YAML output is a starting point for `aovgrade grade --config`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use aovgrade_ops::GradeAovParams;

/// Arguments for the `defaults` command.
#[derive(Args)]
pub struct DefaultsArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the defaults command.
pub fn run(args: DefaultsArgs) -> Result<()> {
    let yaml = GradeAovParams::default().to_yaml()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, yaml)
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            info!("Saved: {}", path.display());
        }
        None => print!("{}", yaml),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grade.yaml");
        run(DefaultsArgs { output: Some(path.clone()) }).unwrap();

        let params = GradeAovParams::from_yaml_file(&path).unwrap();
        assert_eq!(params, GradeAovParams::default());
    }
}
