//! # giftcard-cli.rs
//!
//! Ein Kommandozeilen-Tool zum Betreiben eines Geschenkkarten-Buchs in einem
//! Verzeichnis.
//!
//! ## Befehle:
//! - `hash-code`: Berechnet den Hash eines Codes, wie ihn ein Käufer übermittelt.
//! - `generate-code`: Erzeugt einen zufälligen Code samt Hash.
//! - `deposit` / `balance`: Zahlt Guthaben ein bzw. zeigt es an.
//! - `buy`: Kauft eine Karte für einen Code oder dessen Hash.
//! - `redeem`: Löst eine Karte mit dem Klartext-Code ein.
//! - `reclaim`: Fordert das Guthaben einer abgelaufenen Karte zurück.
//! - `status`: Zeigt den Zustand einer Karte an.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use giftcard_lib::{
    decimal_utils::{format_compact, parse_amount},
    generate_redemption_code, load_ledger_config,
    utils::{format_remaining_validity, format_timestamp, is_expiring_soon},
    CodeHash, FileStorage, GiftCardService, GiftCardState, LedgerConfig, PartyId, RedemptionCode, SystemClock,
};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Das Haupt-Struct für das CLI-Tool, das von `clap` geparst wird.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verzeichnis, in dem Buch und Kontenbuch gespeichert werden.
    #[arg(short, long, default_value = "giftcard_data", global = true)]
    dir: PathBuf,

    /// Pfad zu einer TOML-Konfiguration. Wird nur beim Anlegen eines neuen Buchs verwendet.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Definiert die verfügbaren Unterbefehle.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Berechnet den Keccak-256-Hash eines Codes.
    HashCode { code: RedemptionCode },

    /// Erzeugt einen zufälligen Einlöse-Code.
    GenerateCode {
        #[arg(short, long, default_value_t = giftcard_lib::crypto_utils::DEFAULT_CODE_LENGTH)]
        length: usize,
    },

    /// Zahlt Guthaben auf das Konto einer Partei ein.
    Deposit { party: String, amount: String },

    /// Zeigt das Guthaben einer Partei an.
    Balance { party: String },

    /// Kauft eine Karte. Entweder `--code` oder `--hash` muss angegeben werden.
    Buy {
        #[arg(long)]
        buyer: String,

        #[arg(long)]
        value: String,

        /// Der Klartext-Code; nur sein Hash wird gespeichert.
        #[arg(long, conflicts_with = "hash", required_unless_present = "hash")]
        code: Option<RedemptionCode>,

        /// Ein bereits berechneter Code-Hash (0x-Präfix optional).
        #[arg(long)]
        hash: Option<String>,
    },

    /// Löst eine Karte mit dem Klartext-Code ein.
    Redeem {
        #[arg(long)]
        redeemer: String,

        code: RedemptionCode,
    },

    /// Fordert das Guthaben einer abgelaufenen Karte an den Käufer zurück.
    Reclaim {
        #[arg(long)]
        buyer: String,

        hash: String,
    },

    /// Zeigt den Zustand einer Karte an.
    Status { hash: String },
}

impl Commands {
    /// Der Name des Unterbefehls für Log-Ausgaben, ohne dessen Argumente.
    fn name(&self) -> &'static str {
        match self {
            Commands::HashCode { .. } => "hash-code",
            Commands::GenerateCode { .. } => "generate-code",
            Commands::Deposit { .. } => "deposit",
            Commands::Balance { .. } => "balance",
            Commands::Buy { .. } => "buy",
            Commands::Redeem { .. } => "redeem",
            Commands::Reclaim { .. } => "reclaim",
            Commands::Status { .. } => "status",
        }
    }
}

/// Hauptfunktion des Programms.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftcard_lib=info,giftcard_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    debug!(command = cli.command.name(), dir = %cli.dir.display(), "arguments parsed");

    match cli.command {
        Commands::HashCode { code } => {
            println!("{}", code.code_hash());
        }
        Commands::GenerateCode { length } => {
            let code = generate_redemption_code(length);
            println!("Code: {}", code.expose());
            println!("Hash: {}", code.code_hash());
        }
        Commands::Deposit { party, amount } => {
            let mut service = open_service(&cli.dir, cli.config.as_deref())?;
            let balance = service.deposit(&PartyId::from(party.as_str()), read_amount(&amount)?)?;
            println!("✅ Neues Guthaben von {}: {}", party, format_compact(&balance));
        }
        Commands::Balance { party } => {
            let service = open_service(&cli.dir, cli.config.as_deref())?;
            let balance = service.balance(&PartyId::from(party.as_str()))?;
            println!("{}: {}", party, format_compact(&balance));
        }
        Commands::Buy { buyer, value, code, hash } => {
            let code_hash = match (code, hash) {
                (Some(code), _) => code.code_hash(),
                (None, Some(hash)) => read_hash(&hash)?,
                (None, None) => return Err(anyhow!("Either --code or --hash is required")),
            };
            let mut service = open_service(&cli.dir, cli.config.as_deref())?;
            let receipt = service
                .buy(code_hash, read_amount(&value)?, &PartyId::from(buyer))
                .context("Kauf fehlgeschlagen")?;
            println!("✅ Karte gekauft: {}", receipt.code_hash);
            println!("   - Wert: {}", format_compact(&receipt.value));
            println!("   - Gültig bis: {}", format_timestamp(&receipt.expiration_time));
        }
        Commands::Redeem { redeemer, code } => {
            let mut service = open_service(&cli.dir, cli.config.as_deref())?;
            let payout = service
                .redeem(&code, &PartyId::from(redeemer))
                .context("Einlösung fehlgeschlagen")?;
            println!("✅ {} an {} ausgezahlt.", format_compact(&payout.value), payout.redeemer);
        }
        Commands::Reclaim { buyer, hash } => {
            let mut service = open_service(&cli.dir, cli.config.as_deref())?;
            let reclaim = service
                .reclaim_expired(&read_hash(&hash)?, &PartyId::from(buyer))
                .context("Rückforderung fehlgeschlagen")?;
            println!("✅ {} an {} zurückgebucht.", format_compact(&reclaim.value), reclaim.buyer);
        }
        Commands::Status { hash } => {
            let service = open_service(&cli.dir, cli.config.as_deref())?;
            let status = service.status(&read_hash(&hash)?)?;
            let now = chrono::Utc::now();
            println!("Karte {}", status.code_hash);
            println!("   - Zustand: {}", status.state);
            println!("   - Wert: {}", format_compact(&status.value));
            println!("   - Käufer: {}", status.buyer);
            println!("   - Gekauft: {}", format_timestamp(&status.purchase_time));
            println!("   - Gültig bis: {}", format_timestamp(&status.expiration_time));
            println!("   - Restlaufzeit: {}", format_remaining_validity(&status.expiration_time, &now));
            if status.state == GiftCardState::Active && is_expiring_soon(&status.expiration_time, &now) {
                println!("   ⚠️  Läuft bald ab!");
            }
        }
    }

    Ok(())
}

/// Öffnet den Service im gegebenen Verzeichnis.
fn open_service(dir: &Path, config_path: Option<&Path>) -> Result<GiftCardService> {
    let config = match config_path {
        Some(path) => {
            let toml_str = fs::read_to_string(path)
                .with_context(|| format!("Konnte Konfiguration {} nicht laden", path.display()))?;
            load_ledger_config(&toml_str)
                .with_context(|| format!("Ungültige Konfiguration in {}", path.display()))?
        }
        None => LedgerConfig::default(),
    };
    GiftCardService::open(FileStorage::new(dir), SystemClock, config)
        .with_context(|| format!("Konnte Buch in {} nicht öffnen", dir.display()))
}

fn read_amount(input: &str) -> Result<Decimal> {
    parse_amount(input).with_context(|| format!("Ungültiger Betrag: '{}'", input))
}

fn read_hash(input: &str) -> Result<CodeHash> {
    input
        .parse::<CodeHash>()
        .with_context(|| format!("Ungültiger Code-Hash: '{}'", input))
}
