//! Command line and environment configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::net::content::ContentClient;
use crate::net::fetch::AssetSource;
use crate::page::Route;

/// Personal site and blog viewer.
#[derive(Parser, Debug, Clone)]
#[command(name = "folio", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the content API (e.g. https://cms.example.com).
    #[arg(long, env = "CONTENT_API_URL", global = true)]
    pub api_base: Option<String>,

    /// Where images and models live: an http(s) URL or a directory.
    #[arg(long, env = "FOLIO_ASSETS", default_value = "public", global = true)]
    pub assets: String,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the site in a window (default).
    View {
        /// Route to open first.
        #[arg(long, default_value = "/")]
        route: String,
    },

    /// Write the site as static HTML.
    Export {
        /// Output directory.
        #[arg(long, short)]
        out: PathBuf,
    },
}

impl Cli {
    /// `view /` when no subcommand was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::View { route: "/".to_string() })
    }

    /// Default `env_logger` filter for the chosen verbosity. `RUST_LOG` wins.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    pub fn content_client(&self) -> ContentClient {
        ContentClient::new(self.api_base.as_deref())
    }

    pub fn asset_source(&self) -> AssetSource {
        AssetSource::parse(&self.assets)
    }
}

/// Settings the window needs after argument parsing.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub api_base: Option<String>,
    pub assets: AssetSource,
    pub start: Route,
}

impl ViewConfig {
    pub fn from_cli(cli: &Cli, route: &str) -> Self {
        Self {
            api_base: cli.api_base.clone(),
            assets: cli.asset_source(),
            start: Route::parse(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_viewing_home() {
        let cli = Cli::parse_from(["folio"]);
        assert_eq!(cli.command(), Command::View { route: "/".into() });
        assert_eq!(cli.assets, "public");
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn export_takes_an_output_directory() {
        let cli = Cli::parse_from([
            "folio",
            "--api-base",
            "http://cms.local",
            "export",
            "--out",
            "site",
        ]);
        assert_eq!(cli.command(), Command::Export { out: PathBuf::from("site") });
        assert_eq!(cli.content_client().api_base(), Some("http://cms.local"));
    }

    #[test]
    fn verbosity_raises_the_filter() {
        assert_eq!(Cli::parse_from(["folio", "-vv"]).log_filter(), "debug");
    }

    #[test]
    fn view_config_parses_the_start_route() {
        let cli = Cli::parse_from([
            "folio",
            "--assets",
            "https://example.com",
            "view",
            "--route",
            "/blog/x",
        ]);
        let Command::View { route } = cli.command() else { panic!("not view") };
        let config = ViewConfig::from_cli(&cli, &route);
        assert_eq!(config.start, Route::Post("x".into()));
        assert!(matches!(config.assets, AssetSource::Remote(_)));
    }
}
