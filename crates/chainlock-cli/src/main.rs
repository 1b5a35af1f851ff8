//! Chainlock conversation runner.
//!
//! Runs a scripted conversation between two in-memory sessions that share a
//! random secret, and logs every frame. No networking is involved.
//!
//! # Usage
//!
//! ```bash
//! # Ten alternating messages with HKDF-SHA-256
//! chainlock --messages 10
//!
//! # SHA-512 derivation, fixed associated data, per-frame logging
//! chainlock --hash sha512 --associated-data "conversation-42" --log-level debug
//! ```

mod conversation;

use chainlock_core::Security;
use chainlock_crypto::{CryptoFactory, HashAlgorithm, Hkdf};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::conversation::{Conversation, ConversationConfig};

/// HKDF hash selection
#[derive(Debug, Clone, Copy, ValueEnum)]
enum HashArg {
    /// HKDF-SHA-256
    Sha256,
    /// HKDF-SHA-512
    Sha512,
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Sha256 => Self::Sha256,
            HashArg::Sha512 => Self::Sha512,
        }
    }
}

/// Chainlock symmetric ratchet demo
#[derive(Parser, Debug)]
#[command(name = "chainlock")]
#[command(about = "Run a local conversation over Chainlock ratchet sessions")]
#[command(version)]
struct Args {
    /// Hash function for key derivation
    #[arg(long, value_enum, default_value = "sha256")]
    hash: HashArg,

    /// Number of messages to exchange
    #[arg(short, long, default_value = "6")]
    messages: usize,

    /// Associated data bound to every frame
    #[arg(short, long, default_value = "")]
    associated_data: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let algorithm = HashAlgorithm::from(args.hash);
    tracing::info!(?algorithm, messages = args.messages, "starting conversation");

    let security = Security::new(CryptoFactory::new(Hkdf::new(algorithm)));
    let config = ConversationConfig {
        messages: args.messages,
        associated_data: args.associated_data.into_bytes(),
    };

    let mut conversation = Conversation::start(&security)?;
    let summary = conversation.run(&security, &config)?;

    tracing::info!(
        delivered = summary.delivered,
        bytes_on_wire = summary.bytes_on_wire,
        "conversation complete"
    );

    Ok(())
}
