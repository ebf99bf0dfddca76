use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};

use crate::{
    dataset::{Dataset, DatasetError},
    fixtures::sample_dataset,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "phy-fake-server",
    about = "Fake PHY dedicated server API backed by an in-memory engine",
    version = crate::version::VERSION,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the fake API server (default).
    Run,

    /// Print the built-in sample dataset as JSON.
    Sample,
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(
        long,
        global = true,
        env = "PHY_FAKE_ADDR",
        value_name = "ADDR",
        default_value = "127.0.0.1:8080"
    )]
    pub addr: SocketAddr,

    /// Seed dataset (.json, .yaml or .yml).
    #[arg(long, global = true, env = "PHY_FAKE_DATA", value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Seed with the built-in sample dataset when --data is absent.
    #[arg(long, global = true, env = "PHY_FAKE_SAMPLE")]
    pub sample: bool,

    #[arg(
        long = "action-interval-ms",
        global = true,
        env = "PHY_FAKE_ACTION_INTERVAL_MS",
        value_name = "MS",
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..=60000)
    )]
    pub action_interval_ms: u64,
}

impl Config {
    pub fn action_interval(&self) -> Duration {
        Duration::from_millis(self.action_interval_ms)
    }

    /// `--data` wins over `--sample`; with neither the engine starts empty.
    pub fn load_dataset(&self) -> Result<Dataset, DatasetError> {
        match &self.data {
            Some(path) => Dataset::load(path),
            None if self.sample => Ok(sample_dataset()),
            None => Ok(Dataset::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_flags_absent() {
        let cli = Cli::try_parse_from(["phy-fake-server"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config.addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(cli.config.data, None);
        assert!(!cli.config.sample);
        assert_eq!(cli.config.action_interval(), Duration::from_millis(100));
    }

    #[test]
    fn rejects_invalid_action_interval_ms() {
        let err = Cli::try_parse_from(["phy-fake-server", "--action-interval-ms", "0"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("--action-interval-ms"));
        assert!(msg.contains("1..=60000"));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "phy-fake-server",
            "run",
            "--addr",
            "0.0.0.0:9000",
            "--sample",
            "--action-interval-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Run));
        assert_eq!(cli.config.addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
        assert!(cli.config.sample);
        assert_eq!(cli.config.action_interval(), Duration::from_millis(250));
    }

    #[test]
    fn dataset_source_precedence() {
        let cli = Cli::try_parse_from(["phy-fake-server"]).unwrap();
        assert_eq!(cli.config.load_dataset().unwrap(), Dataset::empty());

        let cli = Cli::try_parse_from(["phy-fake-server", "--sample"]).unwrap();
        assert_eq!(cli.config.load_dataset().unwrap().servers.len(), 2);

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("seed.json");
        std::fs::write(&path, r#"{"generated_id": 7}"#).unwrap();
        let cli = Cli::try_parse_from([
            "phy-fake-server",
            "--sample",
            "--data",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let dataset = cli.config.load_dataset().unwrap();
        assert!(dataset.servers.is_empty());
        assert_eq!(dataset.generated_id, 7);
    }
}
