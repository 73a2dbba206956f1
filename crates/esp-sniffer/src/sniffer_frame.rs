//! Sniffer buffer types: the two fixed-size layouts the ESP8266 firmware
//! hands to the promiscuous-mode receive callback.
//!
//! ```text
//! Short (sniffer_buf, 60 bytes)         Long (sniffer_buf2, 128 bytes)
//! Offset  Size  Field                   Offset  Size  Field
//! 0       12    RxControl               0       12    RxControl
//! 12      36    802.11 header bytes     12      112   802.11 header bytes
//! 48      2     cnt                     124     2     cnt
//! 50      10    LenSeq                  126     2     len
//! ```
//!
//! The two are told apart by total length alone; there is no type tag.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::rx_control::RxControl;

/// Header bytes carried by a short buffer.
pub const SHORT_DATA_LEN: usize = 36;

/// Header bytes carried by a long buffer.
pub const LONG_DATA_LEN: usize = 112;

/// Total size of a short (`sniffer_buf`) buffer.
pub const SHORT_FRAME_LEN: usize = 60;

/// Total size of a long (`sniffer_buf2`) buffer.
pub const LONG_FRAME_LEN: usize = 128;

const _: () = assert!(RxControl::SIZE + SHORT_DATA_LEN + 2 + LenSeq::SIZE == SHORT_FRAME_LEN);
const _: () = assert!(RxControl::SIZE + LONG_DATA_LEN + 2 + 2 == LONG_FRAME_LEN);

/// Which of the two buffer layouts a capture uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameVariant {
    /// `sniffer_buf`: data frames, 36 header bytes plus one length/sequence entry.
    Short,
    /// `sniffer_buf2`: management frames, 112 header bytes.
    Long,
}

impl FrameVariant {
    /// Classify a buffer by its exact total length.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            SHORT_FRAME_LEN => Some(FrameVariant::Short),
            LONG_FRAME_LEN => Some(FrameVariant::Long),
            _ => None,
        }
    }

    /// Total buffer length for this layout.
    pub fn total_len(&self) -> usize {
        match self {
            FrameVariant::Short => SHORT_FRAME_LEN,
            FrameVariant::Long => LONG_FRAME_LEN,
        }
    }

    /// Number of raw header bytes carried after the `RxControl`.
    pub fn data_len(&self) -> usize {
        match self {
            FrameVariant::Short => SHORT_DATA_LEN,
            FrameVariant::Long => LONG_DATA_LEN,
        }
    }
}

/// Length/sequence entry trailing a short buffer (`struct LenSeq`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenSeq {
    /// Length of the packet.
    pub len: u16,
    /// Raw sequence control field.
    pub seq: u16,
    /// Third address of the 802.11 header.
    pub addr3: [u8; 6],
}

impl LenSeq {
    pub const SIZE: usize = 10;

    /// Sequence number (upper 12 bits of the sequence control field).
    pub fn sequence_number(&self) -> u16 {
        self.seq >> 4
    }

    /// Fragment number (lower 4 bits, usually 0).
    pub fn fragment_number(&self) -> u8 {
        (self.seq & 0x0F) as u8
    }
}

/// Variant-specific part of a sniffer buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnifferPayload {
    Short {
        data: [u8; SHORT_DATA_LEN],
        cnt: u16,
        len_seq: LenSeq,
    },
    Long {
        data: [u8; LONG_DATA_LEN],
        cnt: u16,
        len: u16,
    },
}

/// A fully decoded sniffer buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnifferFrame {
    pub header: RxControl,
    pub payload: SnifferPayload,
}

impl SnifferFrame {
    pub fn variant(&self) -> FrameVariant {
        match self.payload {
            SnifferPayload::Short { .. } => FrameVariant::Short,
            SnifferPayload::Long { .. } => FrameVariant::Long,
        }
    }

    /// Raw 802.11 header bytes (36 or 112).
    pub fn data(&self) -> &[u8] {
        match &self.payload {
            SnifferPayload::Short { data, .. } => &data[..],
            SnifferPayload::Long { data, .. } => &data[..],
        }
    }

    /// Firmware packet count field.
    pub fn count(&self) -> u16 {
        match self.payload {
            SnifferPayload::Short { cnt, .. } | SnifferPayload::Long { cnt, .. } => cnt,
        }
    }

    pub fn total_len(&self) -> usize {
        self.variant().total_len()
    }

    pub fn rssi(&self) -> i8 {
        self.header.rssi
    }

    pub fn channel(&self) -> u8 {
        self.header.channel
    }

    /// MCS index, only meaningful for 11n frames.
    pub fn mcs(&self) -> Option<u8> {
        self.header.is_11n().then_some(self.header.mcs)
    }

    pub fn packet_length(&self) -> u16 {
        self.header.packet_length()
    }

    /// Encode back into the firmware layout (60 or 128 bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.total_len()];
        self.header.write_to(&mut out);

        let start = RxControl::SIZE;
        match &self.payload {
            SnifferPayload::Short { data, cnt, len_seq } => {
                let end = start + SHORT_DATA_LEN;
                out[start..end].copy_from_slice(data);
                LittleEndian::write_u16(&mut out[end..end + 2], *cnt);
                LittleEndian::write_u16(&mut out[end + 2..end + 4], len_seq.len);
                LittleEndian::write_u16(&mut out[end + 4..end + 6], len_seq.seq);
                out[end + 6..end + 12].copy_from_slice(&len_seq.addr3);
            }
            SnifferPayload::Long { data, cnt, len } => {
                let end = start + LONG_DATA_LEN;
                out[start..end].copy_from_slice(data);
                LittleEndian::write_u16(&mut out[end..end + 2], *cnt);
                LittleEndian::write_u16(&mut out[end + 2..end + 4], *len);
            }
        }
        out
    }
}
