use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use macmimic_lib::{
    load_catalog, realistic_ttl, validate_mac, AntiDetection, Catalog, EnvironmentFingerprint,
    MacSynthesizer, UNKNOWN_VENDOR,
};
use tracing::Level;

const USAGE: &str = "usage: macmimic <profile|random|validate|hostname|delay|ttl|sequential|vendor|identify|blend|analyze|profiles> [args...]";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML catalog to use instead of the built-in vendor table
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Log verbosity on stderr, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Profile tag or command
    command: Option<String>,

    /// Command arguments
    args: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = args.command else {
        bail!("{USAGE}");
    };

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => Catalog::builtin(),
    };

    let output = run(&catalog, &command.to_lowercase(), &args.args)?;
    println!("{output}");
    Ok(())
}

fn run(catalog: &Catalog, command: &str, rest: &[String]) -> Result<String> {
    let first = rest.first().map(String::as_str);
    let output = match (command, first) {
        ("validate", Some(mac)) => String::from(if validate_mac(mac) { "VALID" } else { "INVALID" }),
        ("hostname", Some(vendor)) => AntiDetection::new(catalog).generate_hostname(vendor),
        ("delay", _) => AntiDetection::new(catalog).stealth_delay_ms().to_string(),
        ("ttl", Some(os)) => realistic_ttl(&os.to_lowercase()).to_string(),
        ("sequential", Some(oui)) => {
            let count = match rest.get(1) {
                Some(n) => n.parse::<usize>()?,
                None => 1,
            };
            MacSynthesizer::new(catalog)
                .generate_sequential_batch(oui, count)
                .join("\n")
        }
        ("vendor", Some(vendor)) => MacSynthesizer::new(catalog).generate_vendor_mac(vendor),
        ("identify", Some(mac)) => catalog
            .identify_vendor(mac)
            .map(|v| v.name.clone())
            .unwrap_or_else(|| UNKNOWN_VENDOR.to_owned()),
        ("blend", Some(_)) => {
            let fingerprint =
                EnvironmentFingerprint::observe(catalog, rest.iter().map(String::as_str));
            fingerprint.blend_mac(&mut MacSynthesizer::new(catalog))
        }
        ("analyze", Some(_)) => {
            let fingerprint =
                EnvironmentFingerprint::observe(catalog, rest.iter().map(String::as_str));
            format!(
                "dominant: {}\nentropy: {:.4}\nrisk: {:.4}\nprofiles: {}",
                fingerprint.dominant_vendor().unwrap_or(UNKNOWN_VENDOR),
                fingerprint.normalized_entropy(),
                fingerprint.risk_score(),
                fingerprint.recommended_profiles().join(", "),
            )
        }
        ("profiles", _) => catalog.profile_tags().collect::<Vec<_>>().join("\n"),
        (
            "validate" | "hostname" | "ttl" | "sequential" | "vendor" | "identify" | "blend"
            | "analyze",
            None,
        ) => {
            bail!("missing argument for {command}\n{USAGE}")
        }
        (profile, _) => MacSynthesizer::new(catalog).generate_profile_mac(profile),
    };
    Ok(output)
}
