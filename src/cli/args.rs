//! CLI argument definitions using clap
//!
//! Commands:
//! - hbasta encode <json> [--prefix-len N]
//! - hbasta decode <hex>
//! - hbasta bound <hex>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hbasta - inspect tagged keys and values of a sorted key-value store
#[derive(Parser, Debug)]
#[command(name = "hbasta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to client configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encode a JSON value into tagged bytes
    Encode {
        /// Value as JSON: integer, string, {"bytes": "<hex>"}, or array
        value: String,

        /// Encode only the first N tuple cells (a scan prefix)
        #[arg(long)]
        prefix_len: Option<usize>,
    },

    /// Decode hex-encoded tagged bytes
    Decode {
        /// Serialized tagged bytes, hex-encoded
        hex: String,
    },

    /// Exclusive upper bound of a prefix scan
    Bound {
        /// Key prefix, hex-encoded
        hex: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode() {
        let cli = Cli::try_parse_from(["hbasta", "encode", "[\"a\", 1]", "--prefix-len", "1"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Encode {
                value: "[\"a\", 1]".into(),
                prefix_len: Some(1)
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::try_parse_from(["hbasta", "bound", "7374723a31", "--config", "c.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert_eq!(cli.command, Command::Bound { hex: "7374723a31".into() });
    }
}
