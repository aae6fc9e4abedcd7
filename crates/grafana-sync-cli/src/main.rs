mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use grafana_sync::ImportOptions;
use grafana_sync_http::{GrafanaClient, GrafanaClientConfig};
use tracing::debug;

#[derive(Parser)]
#[command(name = "grafana-sync")]
#[command(about = "Importer/exporter for Grafana dashboards and datasources")]
struct Cli {
    /// Server URL
    server: String,

    /// Action to perform
    #[arg(value_enum, default_value_t = Action::List)]
    action: Action,

    /// Bearer token sent as the Authorization header
    #[arg(short, long)]
    bearer: Option<String>,

    /// Directory to export to or import from [default: data]
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// On import, skip resources that already exist instead of failing
    #[arg(long = "override")]
    override_existing: bool,

    /// On import, also create datasources
    #[arg(long)]
    datasources: bool,

    /// Increase verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    List,
    Export,
    Import,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings =
        config::load_config().resolve(cli.bearer, config::token_from_env(), cli.path);

    let client = GrafanaClient::new(GrafanaClientConfig {
        base_url: cli.server,
        bearer: settings.bearer,
    });

    debug!("Running action {:?}", cli.action);

    match cli.action {
        Action::List => commands::list::run(&client).await,
        Action::Export => commands::export::run(&client, &settings.path).await,
        Action::Import => {
            let options = ImportOptions {
                override_existing: cli.override_existing,
                import_datasources: cli.datasources,
            };
            commands::import::run(&client, &settings.path, &options).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn action_defaults_to_list() {
        let cli = Cli::try_parse_from(["grafana-sync", "http://grafana:3000"]).unwrap();
        assert_eq!(cli.server, "http://grafana:3000");
        assert_eq!(cli.action, Action::List);
        assert!(cli.path.is_none());
        assert!(!cli.override_existing);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn import_flags_parse() {
        let cli = Cli::try_parse_from([
            "grafana-sync",
            "http://grafana:3000",
            "import",
            "-b",
            "tok",
            "-p",
            "backup",
            "--override",
            "--datasources",
            "-vvv",
        ])
        .unwrap();
        assert_eq!(cli.action, Action::Import);
        assert_eq!(cli.bearer.as_deref(), Some("tok"));
        assert_eq!(cli.path, Some(PathBuf::from("backup")));
        assert!(cli.override_existing);
        assert!(cli.datasources);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result = Cli::try_parse_from(["grafana-sync", "http://grafana:3000", "sync"]);
        assert!(result.is_err());
    }

    #[test]
    fn server_is_required() {
        assert!(Cli::try_parse_from(["grafana-sync"]).is_err());
    }
}
