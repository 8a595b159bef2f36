use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hypx")]
#[command(about = "HypExchange - securities exchange on a key-value ledger")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "HYPX_CONFIG", default_value = "hypx.yaml")]
    pub config: PathBuf,

    /// Principal the command runs as
    #[arg(long, global = true, env = "HYPX_CALLER")]
    pub caller: Option<String>,

    /// Print the Prometheus metrics snapshot after the command
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "hypx.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Open a trading account for the caller
    Register,

    /// Close the caller's trading account
    Deregister,

    /// Show the caller's principal and holder identifier
    Whoami,

    /// Issue a new security to the caller
    Issue {
        symbol: String,
        name: String,
        quantity: u64,
    },

    /// Remove a security from the registry (holdings are kept)
    RemoveSecurity { symbol: String },

    /// Show one security
    Security { symbol: String },

    /// List all securities
    Securities,

    /// Place a buy or sell order
    PlaceOrder {
        symbol: String,

        #[arg(value_enum)]
        side: SideArg,

        quantity: u64,

        price: u64,

        /// Placement time in unix seconds (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,

        /// Order key to use instead of the next sequence number
        #[arg(long)]
        key: Option<String>,
    },

    /// Settle the caller's buy order against a seller's sell order
    Settle {
        #[arg(long)]
        buy_key: String,

        #[arg(long)]
        sell_key: String,

        #[arg(long)]
        symbol: String,

        #[arg(long)]
        price: u64,

        #[arg(long)]
        quantity: u64,

        #[arg(long)]
        buy_timestamp: i64,

        #[arg(long)]
        sell_timestamp: i64,

        /// Seller's holder identifier
        #[arg(long)]
        seller: String,
    },

    /// Show the caller's account
    Account,

    /// Show the caller's balance
    Balance,

    /// Show the caller's holdings
    Holdings,

    /// List every order with its commitment
    Orders,

    /// Show one order record
    Order { key: String },

    /// Regenerate the order index from the order records
    RebuildIndex,
}

impl Commands {
    /// Commands that change the ledger
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Commands::Register
                | Commands::Deregister
                | Commands::Issue { .. }
                | Commands::RemoveSecurity { .. }
                | Commands::PlaceOrder { .. }
                | Commands::Settle { .. }
                | Commands::RebuildIndex
        )
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideArg {
    Buy,
    Sell,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_place_order_args() {
        let cli = Cli::try_parse_from([
            "hypx", "--caller", "alice", "place-order", "ACME", "sell", "10", "5", "--key", "o-1",
        ])
        .unwrap();

        assert_eq!(cli.caller.as_deref(), Some("alice"));
        match cli.command {
            Commands::PlaceOrder { side, quantity, price, timestamp, key, .. } => {
                assert_eq!(side, SideArg::Sell);
                assert_eq!((quantity, price), (10, 5));
                assert_eq!(timestamp, None);
                assert_eq!(key.as_deref(), Some("o-1"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_mutating_commands() {
        let cli = Cli::try_parse_from(["hypx", "balance", "--print-metrics"]).unwrap();
        assert!(cli.print_metrics);
        assert!(!cli.command.is_mutating());

        let cli = Cli::try_parse_from(["hypx", "issue", "ACME", "Acme Corp", "100"]).unwrap();
        assert!(cli.command.is_mutating());
    }
}
