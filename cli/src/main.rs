//! federation-tool
//!
//! Usage:
//!   federation-tool --keys ./keys keygen alice@pod.example
//!   federation-tool parent <guid> --author alice@pod.example --local
//!   federation-tool wrap --sender alice@pod.example --input post.xml
//!   federation-tool unwrap --input envelope.xml
//!   federation-tool convert --to json --input post.xml

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use federation_crypto::DEFAULT_KEY_BITS;
use federation_tool::{Format, KeyDirectory, ParentRecord, ops};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "federation-tool")]
#[command(about = "Sign, wrap, unwrap and convert federation payloads")]
struct Args {
    /// Directory holding <id>.pem and <id>.pub.pem key files
    #[arg(short, long, default_value = "keys")]
    keys: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a key pair for a diaspora ID
    Keygen {
        id: String,

        #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
    },

    /// Record a parent entity that comments, likes and participations refer to
    Parent {
        guid: String,

        #[arg(long)]
        author: String,

        /// Class name of the parent
        #[arg(long, default_value = "Post")]
        entity_type: String,

        /// The author's keys live in this directory
        #[arg(long)]
        local: bool,

        /// The parent is not public
        #[arg(long)]
        private: bool,
    },

    /// Sign an entity and wrap it in an envelope
    Wrap {
        #[arg(long)]
        sender: String,

        /// Entity as XML or JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Encrypt for this recipient
        #[arg(long)]
        recipient: Option<String>,

        /// Emit a Slap instead of a magic envelope
        #[arg(long)]
        legacy: bool,
    },

    /// Verify an envelope and print its entity as JSON
    Unwrap {
        #[arg(short, long)]
        input: PathBuf,

        /// Decrypt with this recipient's private key
        #[arg(long)]
        recipient: Option<String>,

        /// Read a Slap instead of a magic envelope
        #[arg(long)]
        legacy: bool,

        /// Check only the envelope signature, not the entity's
        #[arg(long)]
        unverified: bool,
    },

    /// Convert an entity between XML and JSON
    Convert {
        #[arg(long, value_enum)]
        to: Format,

        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let keys = KeyDirectory::open(&args.keys)?;
    let output = match args.command {
        Command::Keygen { id, bits } => {
            let path = keys.generate(&id, bits)?;
            format!("Wrote {}", path.display())
        }
        Command::Parent {
            guid,
            author,
            entity_type,
            local,
            private,
        } => {
            let record = ParentRecord {
                entity_type,
                author,
                local,
                public: !private,
            };
            let path = keys.add_parent(&guid, &record)?;
            format!("Wrote {}", path.display())
        }
        Command::Wrap {
            sender,
            input,
            recipient,
            legacy,
        } => ops::wrap(&keys, &sender, &read_input(&input)?, recipient.as_deref(), legacy)?,
        Command::Unwrap {
            input,
            recipient,
            legacy,
            unverified,
        } => ops::unwrap(&keys, &read_input(&input)?, recipient.as_deref(), legacy, unverified)?,
        Command::Convert { to, input } => ops::convert(&keys, &read_input(&input)?, to)?,
    };
    println!("{output}");
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
