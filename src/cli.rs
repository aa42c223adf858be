//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

use crate::logging::LogFormat;

/// Serve an in-memory ledger of movie checkouts over HTTP.
#[derive(Parser, Debug)]
#[command(name = "movie-ledger", version, about)]
pub struct Cli {
    /// Address the HTTP server binds to.
    #[arg(long, env = "MOVIE_LEDGER_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(
        long,
        env = "MOVIE_LEDGER_LOG",
        default_value = "movie_ledger=info,tower_http=info"
    )]
    pub log_level: String,

    #[arg(long, env = "MOVIE_LEDGER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Do not log each appended block's payload.
    #[arg(long)]
    pub no_dump: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["movie-ledger"]).unwrap();
        assert_eq!(cli.listen, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(!cli.no_dump);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "movie-ledger",
            "--listen",
            "127.0.0.1:8080",
            "--log-format",
            "json",
            "--no-dump",
        ])
        .unwrap();
        assert_eq!(cli.listen.port(), 8080);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.no_dump);
    }

    #[test]
    fn rejects_bad_address() {
        assert!(Cli::try_parse_from(["movie-ledger", "--listen", "nowhere"]).is_err());
    }
}
