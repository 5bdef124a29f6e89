//! Command-line entry point: `commodo [-d DIR] [-p PORT]`.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use commodo::server::DEFAULT_PORT;
use commodo::{HttpServer, ServerConfig, NAME, VERSION};

/// Browse and download a directory tree over HTTP.
#[derive(Debug, Parser)]
#[command(
    name = "commodo",
    version = VERSION,
    disable_version_flag = true,
    after_help = "This is free software and comes with NO warranty."
)]
struct Cli {
    /// The root directory for the file server [default: your home directory]
    #[arg(short = 'd', long = "directory", value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// The port on which the file server should run
    #[arg(short = 'p', long = "port", value_name = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Prints the version number
    #[arg(short = 'v', long = "version")]
    version: bool,
}

/// What `-v` prints: the name and version, then the warranty notice.
fn version_text() -> String {
    format!("\n {NAME} {VERSION}\nThis is a free software and comes with NO warranty.\n")
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_text());
        return;
    }

    let directory = match cli.directory.or_else(dirs::home_dir) {
        Some(directory) => directory,
        None => {
            eprintln!("Error getting user info.");
            exit(1);
        }
    };

    let config = match ServerConfig::new(&directory, cli.port) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}. Please specify a valid path.");
            exit(1);
        }
    };

    println!("Starting {NAME} with root {}.", config.root.display());
    println!("Press ctrl + c to exit.");

    let server = HttpServer::new(config);
    if let Err(e) = server.start().await {
        eprintln!("{e}");
        exit(1);
    }

    println!("\n{NAME} File server stopped.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_flag_is_parsed() {
        let cli = Cli::try_parse_from(["commodo", "-v"]).unwrap();
        assert!(cli.version);

        let cli = Cli::try_parse_from(["commodo", "--version", "-p", "8080"]).unwrap();
        assert!(cli.version);
        assert_eq!(cli.port, 8080);
    }

    #[test]
    fn test_version_text_carries_warranty_notice() {
        let text = version_text();
        assert!(text.contains(&format!("{NAME} {VERSION}")));
        assert!(text.contains("This is a free software and comes with NO warranty."));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["commodo"]).unwrap();
        assert!(!cli.version);
        assert_eq!(cli.port, DEFAULT_PORT);
        assert!(cli.directory.is_none());
    }
}
