use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "sub-recoded")]
#[command(version = BUILD_VERSION)]
#[command(about = "SUB Recoded - rewriting proxy that serves third-party pages from one origin")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, value_name = "PORT", help = "Listen port (overrides config and PORT)")]
    pub port: Option<u16>,

    #[arg(short, long, global = true, value_name = "ADDR", help = "Bind address (overrides config)")]
    pub bind: Option<IpAddr>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the proxy server (default)")]
    Run,

    #[command(about = "Rewrite an HTML document offline and print the result")]
    #[command(long_about = "Run the page rewriter on a file (or stdin) without fetching anything.\n\nUseful for checking how references in a page will be routed through the proxy.")]
    Rewrite {
        #[arg(long, value_name = "URL", help = "URL the document was fetched from")]
        base: String,
        #[arg(long, value_name = "URL", help = "Proxy prefix, e.g. http://localhost:7777/proxy?u=")]
        proxy_base: Option<String>,
        #[arg(value_name = "FILE", help = "HTML file to rewrite (stdin when omitted)")]
        file: Option<PathBuf>,
    },

    #[command(about = "Inspect configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Print the effective configuration as TOML")]
    Show,
    #[command(about = "Validate the configuration")]
    Validate,
    #[command(about = "Write the effective configuration to a file")]
    Save {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_is_default() {
        let cli = Cli::try_parse_from(["sub-recoded", "-vv", "--port", "8080"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.port, Some(8080));
    }

    #[test]
    fn test_rewrite_args() {
        let cli = Cli::try_parse_from([
            "sub-recoded",
            "rewrite",
            "--base",
            "https://site.example/",
            "page.html",
        ])
        .expect("parse");
        match cli.command {
            Some(Commands::Rewrite { base, proxy_base, file }) => {
                assert_eq!(base, "https://site.example/");
                assert!(proxy_base.is_none());
                assert_eq!(file, Some(PathBuf::from("page.html")));
            }
            _ => panic!("expected rewrite"),
        }
    }

    #[test]
    fn test_invalid_bind_rejected() {
        assert!(Cli::try_parse_from(["sub-recoded", "--bind", "not-an-ip"]).is_err());
    }
}
