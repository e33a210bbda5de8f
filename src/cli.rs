use clap::Parser;
use std::path::PathBuf;

use crate::config::ViewerConfig;

#[derive(Parser, Debug)]
#[command(version, about = "Watch a remote screen over WebRTC", long_about = None)]
pub struct Cli {
    /// Agent base URL, e.g. http://localhost:9000
    #[arg(short, long)]
    pub server: Option<String>,

    /// STUN server URL (repeat for several)
    #[arg(long = "stun")]
    pub stun: Vec<String>,

    /// ICE gathering timeout in milliseconds, 0 to wait indefinitely
    #[arg(long)]
    pub gather_timeout_ms: Option<u64>,

    /// Screen index to select at startup
    #[arg(long)]
    pub screen: Option<i32>,

    /// Start the session right after the screen list loads
    #[arg(long)]
    pub autostart: bool,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Persist the effective settings to the config file
    #[arg(long)]
    pub save_config: bool,

    /// Turn debugging information on (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(ViewerConfig::default_path)
    }

    /// Overlay command line flags on the loaded config
    pub fn apply(&self, config: &mut ViewerConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if !self.stun.is_empty() {
            config.stun_servers = self.stun.clone();
        }
        match self.gather_timeout_ms {
            Some(0) => config.gathering_timeout_ms = None,
            Some(ms) => config.gathering_timeout_ms = Some(ms),
            None => {}
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "screenview",
            "--server",
            "http://agent:9000",
            "--stun",
            "stun:a:3478",
            "--stun",
            "stun:b:3478",
            "--gather-timeout-ms",
            "0",
        ]);
        let mut config = ViewerConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.server_url, "http://agent:9000");
        assert_eq!(config.stun_servers, vec!["stun:a:3478", "stun:b:3478"]);
        assert_eq!(config.gathering_timeout_ms, None);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["screenview"]);
        let mut config = ViewerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Cli::parse_from(["screenview", "-v"]).log_filter(), "debug");
        assert_eq!(Cli::parse_from(["screenview", "-vv"]).log_filter(), "trace");
    }
}
