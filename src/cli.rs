//! Command-line interface parsing and validation
//!
//! This module handles CLI argument parsing using clap and validates
//! user inputs for correctness.

use crate::error::{AppError, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "teleprompt")]
#[command(version = "0.0.1")]
#[command(about = "A smooth-scrolling teleprompter for your terminal", long_about = None)]
pub struct Cli {
    /// Replace the stored script with the contents of this file
    #[arg(short = 's', long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Directory holding preferences.json (defaults to the platform config dir)
    #[arg(short = 'c', long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Keep preference changes in memory only
    #[arg(short = 'e', long)]
    pub ephemeral: bool,
}

impl Cli {
    /// Validate CLI arguments
    /// Returns error if the script file does not exist
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.script {
            if !path.is_file() {
                return Err(AppError::ScriptNotFound(path.display().to_string()));
            }
        }
        Ok(())
    }

    /// Read the `--script` file, if one was given
    pub fn load_script(&self) -> Result<Option<String>> {
        let Some(path) = &self.script else {
            return Ok(None);
        };
        std::fs::read_to_string(path)
            .map(Some)
            .map_err(|e| AppError::ScriptReadError(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["teleprompt"]).unwrap();
        assert!(cli.script.is_none());
        assert!(cli.config_dir.is_none());
        assert!(!cli.ephemeral);
        assert!(cli.validate().is_ok());
        assert!(cli.load_script().unwrap().is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "teleprompt",
            "--config-dir",
            "/tmp/prompt",
            "--log-file",
            "prompt.log",
            "--ephemeral",
        ])
        .unwrap();
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/prompt")));
        assert_eq!(cli.log_file, Some(PathBuf::from("prompt.log")));
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_missing_script_is_rejected() {
        let cli = Cli::try_parse_from(["teleprompt", "--script", "/no/such/script.txt"]).unwrap();
        assert!(matches!(cli.validate(), Err(AppError::ScriptNotFound(_))));
    }

    #[test]
    fn test_script_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Good evening.\nWelcome back.").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::try_parse_from(["teleprompt", "-s", path.as_str()]).unwrap();
        assert!(cli.validate().is_ok());
        assert_eq!(
            cli.load_script().unwrap().as_deref(),
            Some("Good evening.\nWelcome back.")
        );
    }

    #[test]
    fn test_unknown_flag_fails() {
        assert!(Cli::try_parse_from(["teleprompt", "--speed", "3"]).is_err());
    }
}
