//! 'main' for the Acropolis address inspector

use acropolis_address::{
    make_byron_address, make_shelley_address, AddressInEra, AnyAddress, ByronCodec, Credential,
    Era, KeyHash, NetworkConfig, ScriptHash, ShelleyAddressPointer, StakeReference,
};
use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter, Layer as _, Registry,
};

mod report;
use report::AddressReport;

#[derive(Parser, Debug)]
#[command(name = "address-inspector")]
#[command(about = "Decode, build and era-check Cardano addresses")]
struct Args {
    /// Configuration file, read if it exists
    #[arg(long, default_value = "address-inspector")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find an address in some text and describe it
    Inspect {
        /// Text containing the address
        text: String,

        /// Fail unless this era accepts the address
        #[arg(long)]
        era: Option<Era>,
    },

    /// Build a Shelley address on the configured network
    Build {
        /// Payment key hash (hex)
        #[arg(long, required_unless_present = "payment_script", conflicts_with = "payment_script")]
        payment_key: Option<KeyHash>,

        /// Payment script hash (hex)
        #[arg(long)]
        payment_script: Option<ScriptHash>,

        /// Stake key hash (hex)
        #[arg(long, conflicts_with_all = ["stake_script", "pointer"])]
        stake_key: Option<KeyHash>,

        /// Stake script hash (hex)
        #[arg(long, conflicts_with = "pointer")]
        stake_script: Option<ScriptHash>,

        /// Stake pointer
        #[arg(long, num_args = 3, value_names = ["SLOT", "TX_INDEX", "CERT_INDEX"])]
        pointer: Option<Vec<u64>>,
    },

    /// Derive the Byron address of an extended verification key
    Byron {
        /// 64-byte extended verification key (hex)
        verification_key: String,
    },

    /// Tag an address with one era and move it to another
    Migrate {
        text: String,

        #[arg(long)]
        from: Era,

        #[arg(long)]
        to: Era,
    },
}

/// Standard main
pub fn main() -> Result<()> {
    let args = Args::parse();

    // Standard logging using RUST_LOG for log levels
    let fmt_layer =
        fmt::layer().with_writer(std::io::stderr).with_filter(EnvFilter::from_default_env());
    Registry::default().with(fmt_layer).init();

    info!("Acropolis address inspector");

    // Read the config
    let config = Config::builder()
        .add_source(File::with_name(&args.config).required(false))
        .add_source(Environment::with_prefix("ACROPOLIS").separator("_"))
        .build()?;
    let network = NetworkConfig::from_config(&config);

    match args.command {
        Command::Inspect { text, era } => inspect(&network, &text, era),
        Command::Build {
            payment_key,
            payment_script,
            stake_key,
            stake_script,
            pointer,
        } => {
            let payment = match (payment_key, payment_script) {
                (Some(hash), _) => Credential::AddrKeyHash(hash),
                (None, Some(hash)) => Credential::ScriptHash(hash),
                (None, None) => bail!("No payment credential given"),
            };
            let delegation = match (stake_key, stake_script, pointer.as_deref()) {
                (Some(hash), _, _) => StakeReference::ByValue(Credential::AddrKeyHash(hash)),
                (None, Some(hash), _) => StakeReference::ByValue(Credential::ScriptHash(hash)),
                (None, None, Some(&[slot, tx_index, cert_index])) => StakeReference::ByPointer(
                    ShelleyAddressPointer::new(slot, tx_index, cert_index),
                ),
                (None, None, Some(_)) => bail!("Pointer needs slot, tx index and cert index"),
                (None, None, None) => StakeReference::None,
            };

            let address = make_shelley_address(network.address_network(), payment, delegation);
            debug!("Built header {:02x}", address.header());
            print(&AddressReport::new(&AnyAddress::Shelley(address)))
        }
        Command::Byron { verification_key } => {
            let key = hex::decode(verification_key.trim())?;
            let address = make_byron_address(&ByronCodec, network.magic, &key)?;
            print(&AddressReport::new(&AnyAddress::Byron(address)))
        }
        Command::Migrate { text, from, to } => {
            let address = AddressInEra::from_text_in_era(from, &text)?;
            let moved = address.migrate_era(to)?;
            info!("Moved {} address from era {from} to {to}", moved.kind());
            print(&AddressReport::in_era(&moved))
        }
    }
}

fn inspect(network: &NetworkConfig, text: &str, era: Option<Era>) -> Result<()> {
    let address = AnyAddress::from_free_text(text)?;
    debug!("Decoded {} address", address.kind());

    if let Some(found) = address.network() {
        if found != network.address_network() {
            warn!("Address is for {found:?} network but {} is configured", network.id);
        }
    }

    let report = match era {
        Some(era) => {
            let kind = address.kind();
            let tagged = address
                .into_era(era)
                .ok_or_else(|| anyhow!("{kind} address is not accepted in era {era}"))?;
            AddressReport::in_era(&tagged)
        }
        None => AddressReport::new(&address),
    };
    print(&report)
}

fn print(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
