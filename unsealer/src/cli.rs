//! Command-line arguments for the unsealer binary.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "unsealer", version)]
#[command(about = "Unseal a vault with a random quorum of configured key shares.")]
pub struct Cli {
    /// JSON file with `endpoint` and `keys`
    #[arg(short, long, env = "UNSEAL_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Timeout applied to every vault request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Seed for key selection; drawn from OS entropy when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only report whether the vault is sealed
    #[arg(long)]
    pub check: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    /// Clap definition test
    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    /// CLI defaults test
    #[test]
    fn defaults_when_no_flags_given() {
        let cli = Cli::try_parse_from(["unsealer"]).unwrap();
        assert_eq!(cli.timeout(), Duration::from_secs(10));
        assert_eq!(cli.seed, None);
        assert!(!cli.check);
    }

    /// CLI flags test
    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "unsealer",
            "-c",
            "/etc/unseal.json",
            "--timeout",
            "3",
            "--seed",
            "42",
            "--check",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/unseal.json"));
        assert_eq!(cli.timeout(), Duration::from_secs(3));
        assert_eq!(cli.seed, Some(42));
        assert!(cli.check);
    }

    /// Invalid seed test
    #[test]
    fn rejects_non_numeric_seed() {
        assert!(Cli::try_parse_from(["unsealer", "--seed", "abc"]).is_err());
    }
}
