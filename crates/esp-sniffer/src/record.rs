//! SnifferFrame → DecodedRecord conversion.
//!
//! `DecodedRecord` is the flat, fixed-shape view handed to the embedding
//! runtime: signal strength, packet length, the raw 802.11 header bytes and
//! the length of the buffer they came from.

use serde::{Deserialize, Serialize};

use crate::sniffer_frame::SnifferFrame;

/// Metadata extracted from one sniffer buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRecord {
    /// RSSI in dBm.
    pub rssi: i8,
    /// Packet length: HT length for 11n frames, legacy length otherwise.
    pub pktlen: u16,
    /// Owned copy of the raw header region (36 or 112 bytes).
    pub data: Vec<u8>,
    /// Total length of the source buffer (60 or 128), not `data.len()`.
    pub datalen: usize,
}

impl From<&SnifferFrame> for DecodedRecord {
    fn from(frame: &SnifferFrame) -> Self {
        DecodedRecord {
            rssi: frame.rssi(),
            pktlen: frame.packet_length(),
            data: frame.data().to_vec(),
            datalen: frame.total_len(),
        }
    }
}

impl From<SnifferFrame> for DecodedRecord {
    fn from(frame: SnifferFrame) -> Self {
        DecodedRecord::from(&frame)
    }
}
