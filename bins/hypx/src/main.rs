//! HypExchange command-line binary
//!
//! Each invocation runs one exchange operation against the file-backed
//! ledger named in the configuration and prints the result as JSON.

use anyhow::{anyhow, Context, Result};
use cli::{Cli, Commands, SideArg};
use common::{HolderId, LogEmitter, OrderKey, Side, StaticIdentity};
use config::{generate_default_config, load_config, load_or_default, save_config, validate_config, MasterConfig};
use exchange::{Exchange, ExchangeSettings, PlaceOrder, SettleRequest};
use observability::{init_logging, init_metrics};
use serde_json::{json, Value};
use std::path::Path;
use storage::FileLedger;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = match cli.command {
        Commands::Init { .. } => generate_default_config(),
        _ => load_or_default(&cli.config)?,
    };

    init_logging("hypx", config.log_format(), &config.log_level())?;
    debug!(?cli, "CLI arguments parsed");

    let metrics = if cli.print_metrics || config.metrics_enabled() {
        Some(init_metrics()?)
    } else {
        None
    };

    let outcome = match cli.command {
        Commands::Init { output, force } => init_command(&output, force),
        Commands::Validate => validate_command(&cli.config),
        command => exchange_command(&config, cli.caller, command),
    };

    if let Some(handle) = metrics {
        println!("{}", handle.render());
    }

    outcome
}

fn init_command(output_path: &Path, force: bool) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    if output_path.exists() && !force {
        anyhow::bail!("{:?} already exists; pass --force to overwrite", output_path);
    }

    let config = generate_default_config();
    save_config(&config, output_path)?;

    println!("[ok] Configuration file created: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit the file to set the starting balance and ledger path");
    println!("  2. Run 'hypx validate --config {:?}' to check it", output_path);
    println!("  3. Run 'hypx --caller <principal> register' to open an account");

    Ok(())
}

fn validate_command(config_path: &Path) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Exchange: {}", config.exchange.name);
    println!("Version: {}", config.exchange.version);
    println!("Ledger: {:?}", config.ledger_path());
    println!("Starting balance: {}", config.starting_balance());

    Ok(())
}

fn exchange_command(config: &MasterConfig, caller: Option<String>, command: Commands) -> Result<()> {
    let caller = caller.ok_or_else(|| anyhow!("no caller given; pass --caller or set HYPX_CALLER"))?;
    let identity = StaticIdentity::new(caller);

    let ledger_path = config.ledger_path();
    let ledger = FileLedger::open(&ledger_path)
        .with_context(|| format!("Failed to open ledger at {:?}", ledger_path))?;
    let settings = ExchangeSettings {
        starting_balance: config.starting_balance(),
    };
    let mut exchange = Exchange::new(ledger, LogEmitter, settings);

    let mutating = command.is_mutating();
    let output = run(&mut exchange, &identity, command)?;

    if mutating && exchange.ledger().is_dirty() {
        exchange.ledger_mut().flush()?;
        debug!(path = ?ledger_path, "Ledger flushed");
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(
    exchange: &mut Exchange<FileLedger, LogEmitter>,
    caller: &StaticIdentity,
    command: Commands,
) -> Result<Value> {
    let output = match command {
        Commands::Register => serde_json::to_value(exchange.register(caller)?)?,
        Commands::Deregister => {
            exchange.deregister(caller)?;
            json!({ "deregistered": exchange.get_my_hin(caller)? })
        }
        Commands::Whoami => json!({
            "principal": exchange.get_my_id(caller),
            "hin": exchange.get_my_hin(caller)?,
        }),
        Commands::Issue { symbol, name, quantity } => {
            serde_json::to_value(exchange.issue(caller, &symbol, &name, quantity)?)?
        }
        Commands::RemoveSecurity { symbol } => {
            exchange.remove_security(caller, &symbol)?;
            json!({ "removed": symbol })
        }
        Commands::Security { symbol } => serde_json::to_value(exchange.get_security(caller, &symbol)?)?,
        Commands::Securities => serde_json::to_value(exchange.list_securities(caller)?)?,
        Commands::PlaceOrder {
            symbol,
            side,
            quantity,
            price,
            timestamp,
            key,
        } => {
            let side = match side {
                SideArg::Buy => Side::Buy,
                SideArg::Sell => Side::Sell,
            };
            let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());
            let mut request = PlaceOrder::new(symbol, side, quantity, price, timestamp);
            if let Some(key) = key {
                request = request.with_key(OrderKey::new(key)?);
            }
            serde_json::to_value(exchange.place_order(caller, request)?)?
        }
        Commands::Settle {
            buy_key,
            sell_key,
            symbol,
            price,
            quantity,
            buy_timestamp,
            sell_timestamp,
            seller,
        } => {
            let request = SettleRequest {
                buy_key: OrderKey::new(buy_key)?,
                sell_key: OrderKey::new(sell_key)?,
                symbol,
                price,
                quantity,
                buy_timestamp,
                sell_timestamp,
                seller_id: HolderId::parse(seller)?,
            };
            serde_json::to_value(exchange.settle(caller, &request)?)?
        }
        Commands::Account => serde_json::to_value(exchange.get_account(caller)?)?,
        Commands::Balance => json!({ "balance": exchange.get_balance(caller)? }),
        Commands::Holdings => serde_json::to_value(exchange.get_holdings(caller)?)?,
        Commands::Orders => serde_json::to_value(exchange.get_all_orders(caller)?)?,
        Commands::Order { key } => serde_json::to_value(exchange.get_order(caller, &OrderKey::new(key)?)?)?,
        Commands::RebuildIndex => json!({ "indexed": exchange.rebuild_order_index(caller)? }),
        Commands::Init { .. } | Commands::Validate => {
            anyhow::bail!("configuration commands do not run against the ledger")
        }
    };

    Ok(output)
}
