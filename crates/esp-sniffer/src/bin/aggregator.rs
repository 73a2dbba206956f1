//! UDP aggregator CLI for forwarded ESP8266 sniffer buffers.
//!
//! Listens for raw sniffer buffers on a UDP socket, decodes each one, and
//! prints a one-line summary (or a JSON object) per record to stdout.
//!
//! Usage:
//!   cargo run -p esp-sniffer --bin sniffer-aggregator -- --port 5006 --json

use std::thread;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use esp_sniffer::{AggregatorConfig, CapturedRecord, SnifferAggregator};

/// UDP aggregator for ESP8266 sniffer relays.
#[derive(Parser)]
#[command(
    name = "sniffer-aggregator",
    about = "Receive and display sniffer buffers forwarded by ESP8266 nodes"
)]
struct Cli {
    /// Address to bind the UDP listener to.
    #[arg(long, default_value = "0.0.0.0")]
    bind_addr: String,

    /// UDP port to listen on.
    #[arg(long, short, default_value_t = 5006)]
    port: u16,

    /// Capacity of the queue between the receive thread and the printer.
    #[arg(long, default_value_t = 1024)]
    capacity: usize,

    /// Print each record as a JSON object.
    #[arg(long)]
    json: bool,

    /// Print the leading header bytes alongside the summary.
    #[arg(long, short)]
    verbose: bool,
}

fn summary(captured: &CapturedRecord, verbose: bool) -> String {
    let rec = &captured.record;
    let mut line = format!(
        "[ch:{} {}] rssi={} pktlen={} datalen={}",
        captured.channel, captured.source, rec.rssi, rec.pktlen, rec.datalen,
    );
    if verbose {
        // frame control, duration and the first three addresses
        let hex: Vec<String> = rec.data.iter().take(24).map(|b| format!("{:02x}", b)).collect();
        line.push_str(" hdr=");
        line.push_str(&hex.join(""));
    }
    line
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = AggregatorConfig {
        bind_addr: cli.bind_addr.clone(),
        port: cli.port,
        channel_capacity: cli.capacity,
    };

    let (mut aggregator, rx) = SnifferAggregator::new(&config)
        .with_context(|| format!("cannot bind to {}:{}", config.bind_addr, config.port))?;

    let receiver = thread::spawn(move || aggregator.run());

    for captured in rx {
        if cli.json {
            println!("{}", serde_json::to_string(&captured)?);
        } else {
            println!("{}", summary(&captured, cli.verbose));
        }
    }

    match receiver.join() {
        Ok(result) => result.context("receive loop failed")?,
        Err(_) => bail!("receive thread panicked"),
    }
    Ok(())
}
