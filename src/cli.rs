use clap::Parser;
use std::path::PathBuf;

/// Parameter form server - renders schema-driven parameter forms
#[derive(Parser, Debug, Clone)]
#[command(name = "paramform", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PARAMFORM_CONFIG", default_value = "paramform.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "PARAMFORM_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "PARAMFORM_PORT")]
    pub port: Option<u16>,

    /// Number of testcases, used by fixed-count (testcase) parameters
    #[arg(long, env = "PARAMFORM_TESTCASES")]
    pub testcases: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["paramform"]);
        assert_eq!(cli.config, PathBuf::from("paramform.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.testcases.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "paramform",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--testcases",
            "12",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.testcases, Some(12));
    }
}
