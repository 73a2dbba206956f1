//! UDP aggregator for forwarded sniffer buffers.
//!
//! A relay firmware forwards each promiscuous-mode receive buffer verbatim,
//! one buffer per datagram. The aggregator decodes every datagram, keeps
//! per-channel counters, and forwards the decoded records to the consumer
//! through an `mpsc` channel.

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::mpsc::{self, Receiver, SyncSender};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::DecodedRecord;
use crate::sniffer_parser::SnifferParser;

/// Configuration for the UDP aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Address to bind the UDP socket to.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Capacity of the record channel. Records are dropped while it is full.
    pub channel_capacity: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5006,
            channel_capacity: 1024,
        }
    }
}

/// A decoded record together with where and when it arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedRecord {
    pub received_at: DateTime<Utc>,
    pub source: SocketAddr,
    pub channel: u8,
    pub record: DecodedRecord,
}

/// Per-channel counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Frames decoded on this channel.
    pub frames: u64,
    /// How many of them were 11n frames.
    pub ht_frames: u64,
    /// RSSI of the most recent frame.
    pub last_rssi: i8,
}

impl ChannelStats {
    fn update(&mut self, rssi: i8, is_11n: bool) {
        self.frames += 1;
        if is_11n {
            self.ht_frames += 1;
        }
        self.last_rssi = rssi;
    }
}

/// UDP aggregator that receives sniffer buffers from relay nodes.
pub struct SnifferAggregator {
    socket: UdpSocket,
    channels: HashMap<u8, ChannelStats>,
    rejected: u64,
    tx: SyncSender<CapturedRecord>,
}

impl SnifferAggregator {
    /// Create a new aggregator bound to the configured address.
    pub fn new(config: &AggregatorConfig) -> io::Result<(Self, Receiver<CapturedRecord>)> {
        let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port)
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let socket = UdpSocket::bind(addr)?;
        let (tx, rx) = mpsc::sync_channel(config.channel_capacity);

        tracing::info!("Sniffer aggregator bound to {}", addr);

        Ok((Self::from_socket(socket, tx), rx))
    }

    /// Create an aggregator from an existing socket (for testing).
    pub fn from_socket(socket: UdpSocket, tx: SyncSender<CapturedRecord>) -> Self {
        Self {
            socket,
            channels: HashMap::new(),
            rejected: 0,
            tx,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Run the blocking receive loop. Call from a dedicated thread.
    ///
    /// Returns when the socket fails or the receiving side of the channel
    /// has been dropped.
    pub fn run(&mut self) -> io::Result<()> {
        let mut buf = [0u8; 2048];
        loop {
            let (n, src) = self.socket.recv_from(&mut buf)?;
            if !self.handle_packet(&buf[..n], src) {
                tracing::info!("Record consumer disconnected, stopping aggregator");
                return Ok(());
            }
        }
    }

    /// Handle a single datagram. Public for unit testing.
    ///
    /// Returns `false` once the consumer has gone away.
    pub fn handle_packet(&mut self, data: &[u8], source: SocketAddr) -> bool {
        let frame = match SnifferParser::parse_frame(data) {
            Ok(frame) => frame,
            Err(e) => {
                self.rejected += 1;
                tracing::debug!("Dropping datagram from {}: {}", source, e);
                return true;
            }
        };

        let channel = frame.channel();
        self.channels
            .entry(channel)
            .or_default()
            .update(frame.rssi(), frame.header.is_11n());

        let captured = CapturedRecord {
            received_at: Utc::now(),
            source,
            channel,
            record: DecodedRecord::from(&frame),
        };
        tracing::trace!(
            channel,
            rssi = captured.record.rssi,
            pktlen = captured.record.pktlen,
            "decoded sniffer buffer"
        );

        match self.tx.try_send(captured) {
            Ok(()) => true,
            Err(mpsc::TrySendError::Full(_)) => {
                tracing::warn!("Record channel full, dropping frame from {}", source);
                true
            }
            Err(mpsc::TrySendError::Disconnected(_)) => false,
        }
    }

    /// Counters for one channel, if any frame has been seen on it.
    pub fn stats_for_channel(&self, channel: u8) -> Option<ChannelStats> {
        self.channels.get(&channel).copied()
    }

    /// Number of channels frames have been seen on.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Datagrams that were not a recognizable sniffer buffer.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
