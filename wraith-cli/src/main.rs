//! WRAITH CLI
//!
//! Command-line interface for dual-key stealth addresses over secp256k1.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wraith_core::config::{AddressFormat, HashAlgorithm, SuiteConfig};
use wraith_core::types::{Announcement, CompressedPoint, MetaAddress, StealthAddress};
use wraith_crypto::{suite_for, validate_meta_address};
use wraith_scanner::{ProgressCallback, ScanSummary, Scanner, ScannerConfig};
use wraith_stealth::{StealthPaymentBuilder, StealthWallet, WalletConfig, WalletExport};

/// WRAITH - Dual-Key Stealth Addresses over secp256k1
#[derive(Parser)]
#[command(name = "wraith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "WRAITH_LOG_JSON")]
    log_json: bool,

    /// Shared-secret hash for keygen, send and bench (key files carry their own)
    #[arg(long, global = true, env = "WRAITH_HASH", default_value = "sha256")]
    hash: HashAlgorithm,

    /// Stealth address format for keygen, send and bench
    #[arg(long, global = true, env = "WRAITH_ADDRESS_FORMAT", default_value = "cosmos")]
    address_format: AddressFormat,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn suite(&self) -> SuiteConfig {
        SuiteConfig::new(self.hash, self.address_format)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate new stealth keys
    Keygen {
        /// Output file for keys (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Label stored with the keys
        #[arg(short, long)]
        label: Option<String>,
        /// Only write the view secret (watch-only key file)
        #[arg(long)]
        view_only: bool,
    },

    /// Assemble a meta-address from two public keys
    Meta {
        /// Public view key (compressed, hex)
        #[arg(long)]
        view_pk: String,
        /// Public spend key (compressed, hex)
        #[arg(long)]
        spend_pk: String,
    },

    /// Create a stealth payment address
    Send {
        /// Recipient's meta-address (hex)
        meta_address: String,
        /// Append the announcement to this JSON file
        #[arg(short, long)]
        publish: Option<PathBuf>,
        /// Informational amount
        #[arg(long)]
        amount: Option<String>,
        /// Denomination
        #[arg(long)]
        token: Option<String>,
    },

    /// Check whether a stealth address belongs to a key file
    Check {
        /// Path to keys file
        #[arg(short, long)]
        keys: PathBuf,
        /// Stealth address (hex)
        #[arg(short, long)]
        address: String,
        /// Ephemeral public key from the announcement (hex)
        #[arg(short, long)]
        ephemeral: String,
    },

    /// Recover the private key of a stealth address
    Recover {
        /// Path to keys file (must include the spend secret)
        #[arg(short, long)]
        keys: PathBuf,
        /// Stealth address (hex)
        #[arg(short, long)]
        address: String,
        /// Ephemeral public key from the announcement (hex)
        #[arg(short, long)]
        ephemeral: String,
    },

    /// Scan announcements for payments
    Scan {
        /// Path to keys file
        #[arg(short, long)]
        keys: PathBuf,
        /// Path to announcements file (JSON array)
        #[arg(short, long)]
        announcements: PathBuf,
        /// Scan on all cores
        #[arg(long)]
        parallel: bool,
        /// Worker count for parallel scans
        #[arg(long)]
        workers: Option<usize>,
        /// Run the full check on every announcement
        #[arg(long)]
        no_view_tags: bool,
    },

    /// Run benchmarks
    Bench {
        /// Number of announcements to generate
        #[arg(short, long, default_value = "10000")]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let suite = cli.suite();
    debug!(%suite, "Selected suite");

    match cli.command {
        Commands::Keygen { output, label, view_only } => cmd_keygen(suite, output, label, view_only),
        Commands::Meta { view_pk, spend_pk } => cmd_meta(&view_pk, &spend_pk),
        Commands::Send { meta_address, publish, amount, token } => {
            cmd_send(suite, &meta_address, publish.as_deref(), amount, token)
        }
        Commands::Check { keys, address, ephemeral } => cmd_check(&keys, &address, &ephemeral),
        Commands::Recover { keys, address, ephemeral } => cmd_recover(&keys, &address, &ephemeral),
        Commands::Scan { keys, announcements, parallel, workers, no_view_tags } => {
            let mut config = ScannerConfig::new();
            if let Some(workers) = workers {
                config = config.workers(workers);
            }
            if no_view_tags {
                config = config.ignore_view_tags();
            }
            cmd_scan(&keys, &announcements, config, parallel).await
        }
        Commands::Bench { count } => cmd_bench(suite, count).await,
    }
}

/// Generate new stealth keys
fn cmd_keygen(suite: SuiteConfig, output: Option<PathBuf>, label: Option<String>, view_only: bool) -> Result<()> {
    println!("{} {}", "🔑 Generating stealth keys:".cyan().bold(), suite);

    let wallet = StealthWallet::generate_with_config(WalletConfig { label, suite })
        .context("Failed to generate keys")?;

    let export = if view_only {
        wallet.export_view_only()
    } else {
        wallet.export_full()
    };

    println!("   {} {}", "Meta-address:".yellow(), wallet.meta_address().to_hex());

    if let Some(path) = output {
        save_keys(&path, &export)?;
        println!("{} {}", "✅ Keys saved to:".green(), path.display());
    } else {
        println!("\n{}", "Keys (JSON):".yellow().bold());
        println!("{}", export.to_json()?);
    }

    println!("\n{}", "⚠️  IMPORTANT: Keep your secret keys safe!".red().bold());
    println!("   view_secret reveals which payments are yours; spend_secret spends them.");

    Ok(())
}

/// Assemble and validate a meta-address
fn cmd_meta(view_pk: &str, spend_pk: &str) -> Result<()> {
    let view = CompressedPoint::from_hex(view_pk).context("Invalid view public key")?;
    let spend = CompressedPoint::from_hex(spend_pk).context("Invalid spend public key")?;

    let meta = MetaAddress::new(view, spend);
    validate_meta_address(&meta).context("Meta-address rejected")?;

    println!("{}", "✅ Meta-address:".green().bold());
    println!("{}", meta.to_hex());

    Ok(())
}

/// Create stealth payment address
fn cmd_send(
    suite: SuiteConfig,
    recipient: &str,
    publish: Option<&Path>,
    amount: Option<String>,
    token: Option<String>,
) -> Result<()> {
    println!("{} {}", "💸 Creating stealth payment to:".cyan().bold(), recipient);

    let meta = MetaAddress::from_hex(recipient).context("Invalid meta-address hex")?;

    let mut builder = StealthPaymentBuilder::new().recipient(meta).suite(suite);
    if let Some(amount) = amount {
        builder = builder.amount(amount);
    }
    if let Some(token) = token {
        builder = builder.token(token);
    }
    let mut payment = builder.build().context("Failed to create stealth payment")?;

    println!("\n{}", "✅ Stealth payment created:".green().bold());
    println!("   {} {}", "Address:".yellow(), payment.stealth_address);
    println!("   {} {}", "Ephemeral key:".dimmed(), payment.announcement.ephemeral_public_key);
    if let Some(tag) = payment.announcement.view_tag {
        println!("   {} {:#04x}", "View tag:".dimmed(), tag);
    }

    if let Some(path) = publish {
        payment.announcement.id = append_announcement(path, payment.announcement.clone())?;
        println!("   {} {} (#{})", "Published to:".dimmed(), path.display(), payment.announcement.id);
    }

    println!("\n{}", "📋 Announcement (JSON):".yellow().bold());
    println!("{}", serde_json::to_string_pretty(&payment.announcement)?);

    println!("\n{}", "ℹ️  Next steps:".cyan());
    println!("   1. Send funds to the stealth address above");
    println!("   2. Publish the announcement where the recipient scans");

    Ok(())
}

/// Check ownership of a stealth address
fn cmd_check(keys_path: &Path, address: &str, ephemeral: &str) -> Result<()> {
    let export = load_keys(keys_path)?;
    let address = StealthAddress::from_hex(address).context("Invalid stealth address")?;
    let ephemeral = CompressedPoint::from_hex(ephemeral).context("Invalid ephemeral key")?;

    let suite = suite_for(&export.suite);
    let mine = suite
        .check_stealth_address(&address, &ephemeral, &export.view_secret, &export.spend_public)
        .context("Check failed")?;

    if mine {
        println!("{} {} belongs to these keys", "✅".green(), address);
    } else {
        println!("{} {} is not ours", "❌".red(), address);
    }

    Ok(())
}

/// Recover the one-time private key
fn cmd_recover(keys_path: &Path, address: &str, ephemeral: &str) -> Result<()> {
    let export = load_keys(keys_path)?;
    let Some(spend_secret) = export.spend_secret.as_ref() else {
        bail!("{} is a view-only key file; recovery needs the spend secret", keys_path.display());
    };

    let address = StealthAddress::from_hex(address).context("Invalid stealth address")?;
    let ephemeral = CompressedPoint::from_hex(ephemeral).context("Invalid ephemeral key")?;

    let suite = suite_for(&export.suite);
    if !suite.check_stealth_address(&address, &ephemeral, &export.view_secret, &export.spend_public)? {
        bail!("{address} does not belong to these keys");
    }

    let key = suite
        .compute_stealth_key(&address, &ephemeral, &export.view_secret, spend_secret)
        .context("Key derivation failed")?;

    println!("{} {}", "✅ Private key for".green().bold(), address);
    println!("{}", key.to_hex());
    println!("\n{}", "⚠️  Anyone with this key can spend from the address.".red().bold());

    Ok(())
}

/// Scan for payments
async fn cmd_scan(keys_path: &Path, announcements_path: &Path, config: ScannerConfig, parallel: bool) -> Result<()> {
    println!("{}", "🔎 Scanning for payments...".cyan().bold());

    let export = load_keys(keys_path)?;
    if export.is_view_only() {
        println!("   Watch-only keys: payments are detected but keys are not recovered");
    }

    let announcements = load_announcements(announcements_path)?;
    let count = announcements.len() as u64;

    if count == 0 {
        println!("\n{}", "⚠️  No announcements to scan.".yellow());
        return Ok(());
    }

    let scanner = Scanner::from_export(&export).with_config(config);

    let pb = ProgressBar::new(count);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let (discoveries, summary) = if parallel {
        let scanner = Arc::new(scanner);
        let found = scanner.scan_parallel(announcements.into()).await?;
        pb.set_position(count);
        (found, ScanSummary::from(scanner.stats()))
    } else {
        let bar = pb.clone();
        let callback: ProgressCallback = Box::new(move |progress| bar.set_position(progress.scanned));
        let found = scanner.scan_with_progress(&announcements, callback)?;
        (found, ScanSummary::from(scanner.stats()))
    };

    pb.finish_and_clear();

    println!(
        "   Scanned {} announcements in {} ms ({:.1}% rejected by view tag, {} malformed)",
        summary.total_scanned, summary.duration_ms, summary.filter_efficiency, summary.errors
    );

    if discoveries.is_empty() {
        println!("\n{}", "No payments found.".yellow());
    } else {
        println!("\n{} {} payment(s) found:", "✅".green(), discoveries.len());
        for found in &discoveries {
            println!("   {} {}", "Address:".green(), found.payment.address);
            println!("      Announcement #{}", found.announcement.id);
            if let Some(key) = &found.payment.stealth_key {
                println!("      {} {}", "Key:".dimmed(), key.to_hex());
            }
        }
    }

    Ok(())
}

/// Run benchmarks
async fn cmd_bench(suite: SuiteConfig, count: usize) -> Result<()> {
    println!("{} {} announcements ({})", "📊 Benchmarking with".cyan().bold(), count, suite);

    // Generate keys
    println!("\n{}", "1. Generating keys...".dimmed());
    let start = Instant::now();
    let wallet = StealthWallet::generate_with_config(WalletConfig { label: None, suite })?;
    let stranger = StealthWallet::generate()?;
    println!("   ✓ Key generation: {:?}", start.elapsed());

    // Create announcements
    println!("\n{}", "2. Creating announcements...".dimmed());
    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut announcements = Vec::with_capacity(count);
    for i in 0..count {
        // Mix of our payments and foreign ones
        let recipient = if i % 100 == 0 { wallet.meta_address() } else { stranger.meta_address() };
        let mut payment = StealthPaymentBuilder::new()
            .recipient(*recipient)
            .suite(suite)
            .build()?;
        payment.announcement.id = i as u64;
        announcements.push(payment.announcement);
        pb.inc(1);
    }
    pb.finish();
    println!("   ✓ Created {} announcements: {:?}", count, start.elapsed());

    // Scan
    println!("\n{}", "3. Scanning...".dimmed());
    let scanner = Scanner::from_wallet(&wallet);
    let start = Instant::now();
    let discoveries = scanner.scan(&announcements)?;
    let scan_time = start.elapsed();
    println!("   ✓ Sequential: {:?}", scan_time);

    let parallel = Arc::new(Scanner::from_wallet(&wallet));
    let start = Instant::now();
    let parallel_found = parallel.scan_parallel(announcements.into()).await?;
    let parallel_time = start.elapsed();
    println!("   ✓ Parallel:   {:?}", parallel_time);

    let summary = ScanSummary::from(scanner.stats());
    let rate = count as f64 / scan_time.as_secs_f64();

    println!("\n{}", "📈 Results:".green().bold());
    println!("   Scan rate: {:.0} announcements/sec", rate);
    println!(
        "   Parallel rate: {:.0} announcements/sec",
        count as f64 / parallel_time.as_secs_f64()
    );
    println!("   Time per announcement: {:.2}µs", scan_time.as_micros() as f64 / count as f64);
    println!("   View tag filter efficiency: {:.2}%", summary.filter_efficiency);

    let expected_discoveries = count.div_ceil(100);
    if discoveries.len() == expected_discoveries && parallel_found.len() == expected_discoveries {
        println!("   {} All expected payments found!", "✅".green());
    } else {
        println!(
            "   {} Expected {}, found {} (parallel {})",
            "❌".red(),
            expected_discoveries,
            discoveries.len(),
            parallel_found.len()
        );
    }

    Ok(())
}

fn load_keys(path: &Path) -> Result<WalletExport> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keys file {}", path.display()))?;
    WalletExport::from_json(&json).with_context(|| format!("Invalid keys file {}", path.display()))
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        "wraith=debug,info"
    } else {
        "wraith=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn save_keys(path: &Path, export: &WalletExport) -> Result<()> {
    std::fs::write(path, export.to_json()?)
        .with_context(|| format!("Failed to write keys file {}", path.display()))
}

fn load_announcements(path: &Path) -> Result<Vec<Announcement>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open announcements file {}", path.display()))?;
    let announcements: Vec<Announcement> = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Invalid announcements file {}", path.display()))?;

    for announcement in &announcements {
        announcement
            .validate()
            .with_context(|| format!("Announcement {} in {}", announcement.id, path.display()))?;
    }
    Ok(announcements)
}

/// Appends to the file (creating it if missing) and returns the assigned id.
fn append_announcement(path: &Path, mut announcement: Announcement) -> Result<u64> {
    let mut announcements = if path.exists() {
        load_announcements(path)?
    } else {
        Vec::new()
    };

    announcement.id = announcements.iter().map(|a| a.id + 1).max().unwrap_or(0);
    let id = announcement.id;
    announcements.push(announcement);

    std::fs::write(path, serde_json::to_string_pretty(&announcements)?)
        .with_context(|| format!("Failed to write announcements file {}", path.display()))?;
    Ok(id)
}
