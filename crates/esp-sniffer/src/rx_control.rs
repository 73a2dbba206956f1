//! Radio metadata header prepended by the ESP8266 firmware to every
//! promiscuous-mode receive buffer (`struct RxControl`, technical reference
//! section 14.1).
//!
//! # Layout
//!
//! 12 bytes, read as three little-endian 32-bit words. Within each word the
//! fields are packed from the least significant bit upward:
//!
//! ```text
//! Word  Bits     Field
//! ----  -------  -----
//! 0     0..8     rssi (signed)
//! 0     8..12    rate
//! 0     12       is_group
//! 0     13       (reserved)
//! 0     14..16   sig_mode         0 = legacy, non-zero = 11n
//! 0     16..28   legacy_length    valid when sig_mode == 0
//! 0     28..32   damatch0, damatch1, bssidmatch0, bssidmatch1
//! 1     0..7     mcs              valid when sig_mode != 0 (0..=76)
//! 1     7        cwb              HT40
//! 1     8..24    ht_length        valid when sig_mode != 0
//! 1     24       smoothing
//! 1     25       not_sounding
//! 1     26       (reserved)
//! 1     27       aggregation
//! 1     28..30   stbc
//! 1     30       fec_coding       LDPC
//! 1     31       sgi
//! 2     0..8     rxend_state
//! 2     8..16    ampdu_cnt
//! 2     16..20   channel
//! 2     20..32   (reserved)
//! ```
//!
//! Fields are extracted with explicit shifts and masks; the layout does not
//! depend on how any compiler lays out bit-fields.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

#[inline]
fn field(word: u32, offset: u32, width: u32) -> u32 {
    debug_assert!(width < 32);
    (word >> offset) & ((1 << width) - 1)
}

#[inline]
fn flag(word: u32, bit: u32) -> bool {
    (word >> bit) & 1 == 1
}

#[inline]
fn pack(value: u32, offset: u32, width: u32) -> u32 {
    (value & ((1 << width) - 1)) << offset
}

/// Decoded `RxControl` header.
///
/// Every bit pattern is a valid header; range checks on RSSI, channel or MCS
/// are left to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxControl {
    /// Signal strength of the packet in dBm.
    pub rssi: i8,
    /// Legacy PHY rate index (4 bits).
    pub rate: u8,
    /// Group-addressed frame.
    pub is_group: bool,
    /// 0 for legacy frames, non-zero for 11n frames (2 bits).
    pub sig_mode: u8,
    /// Packet length when `sig_mode == 0` (12 bits).
    pub legacy_length: u16,
    pub damatch0: bool,
    pub damatch1: bool,
    pub bssidmatch0: bool,
    pub bssidmatch1: bool,
    /// Modulation and coding scheme for 11n frames (7 bits).
    pub mcs: u8,
    /// HT40 frame.
    pub cwb: bool,
    /// Packet length when `sig_mode != 0`.
    pub ht_length: u16,
    pub smoothing: bool,
    pub not_sounding: bool,
    pub aggregation: bool,
    /// Space-time block coding (2 bits).
    pub stbc: u8,
    /// LDPC coded frame.
    pub fec_coding: bool,
    /// Short guard interval.
    pub sgi: bool,
    pub rxend_state: u8,
    pub ampdu_cnt: u8,
    /// Channel the packet was received on (4 bits).
    pub channel: u8,
}

/// PHY mode summary derived from `sig_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhyMode {
    /// 802.11b/g frame.
    Legacy {
        /// Firmware rate index.
        rate: u8,
    },
    /// 802.11n frame.
    HighThroughput {
        mcs: u8,
        ht40: bool,
        short_gi: bool,
        ldpc: bool,
        stbc: u8,
    },
}

impl RxControl {
    /// Size of the header on the wire.
    pub const SIZE: usize = 12;

    /// Decode a header from the first 12 bytes of `buf`.
    ///
    /// Returns `None` when fewer than 12 bytes are available.
    pub fn read_from(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::SIZE {
            return None;
        }
        let w0 = LittleEndian::read_u32(&buf[0..4]);
        let w1 = LittleEndian::read_u32(&buf[4..8]);
        let w2 = LittleEndian::read_u32(&buf[8..12]);

        Some(Self {
            rssi: field(w0, 0, 8) as u8 as i8,
            rate: field(w0, 8, 4) as u8,
            is_group: flag(w0, 12),
            sig_mode: field(w0, 14, 2) as u8,
            legacy_length: field(w0, 16, 12) as u16,
            damatch0: flag(w0, 28),
            damatch1: flag(w0, 29),
            bssidmatch0: flag(w0, 30),
            bssidmatch1: flag(w0, 31),

            mcs: field(w1, 0, 7) as u8,
            cwb: flag(w1, 7),
            ht_length: field(w1, 8, 16) as u16,
            smoothing: flag(w1, 24),
            not_sounding: flag(w1, 25),
            aggregation: flag(w1, 27),
            stbc: field(w1, 28, 2) as u8,
            fec_coding: flag(w1, 30),
            sgi: flag(w1, 31),

            rxend_state: field(w2, 0, 8) as u8,
            ampdu_cnt: field(w2, 8, 8) as u8,
            channel: field(w2, 16, 4) as u8,
        })
    }

    /// Pack the header into `buf`. Returns bytes written (12, or 0 if `buf`
    /// is too short).
    ///
    /// Values wider than their field are truncated to the field width;
    /// reserved bits are written as zero.
    pub fn write_to(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        let w0 = pack(self.rssi as u8 as u32, 0, 8)
            | pack(self.rate as u32, 8, 4)
            | pack(self.is_group as u32, 12, 1)
            | pack(self.sig_mode as u32, 14, 2)
            | pack(self.legacy_length as u32, 16, 12)
            | pack(self.damatch0 as u32, 28, 1)
            | pack(self.damatch1 as u32, 29, 1)
            | pack(self.bssidmatch0 as u32, 30, 1)
            | pack(self.bssidmatch1 as u32, 31, 1);
        let w1 = pack(self.mcs as u32, 0, 7)
            | pack(self.cwb as u32, 7, 1)
            | pack(self.ht_length as u32, 8, 16)
            | pack(self.smoothing as u32, 24, 1)
            | pack(self.not_sounding as u32, 25, 1)
            | pack(self.aggregation as u32, 27, 1)
            | pack(self.stbc as u32, 28, 2)
            | pack(self.fec_coding as u32, 30, 1)
            | pack(self.sgi as u32, 31, 1);
        let w2 = pack(self.rxend_state as u32, 0, 8)
            | pack(self.ampdu_cnt as u32, 8, 8)
            | pack(self.channel as u32, 16, 4);

        LittleEndian::write_u32(&mut buf[0..4], w0);
        LittleEndian::write_u32(&mut buf[4..8], w1);
        LittleEndian::write_u32(&mut buf[8..12], w2);
        Self::SIZE
    }

    /// Whether this is an 802.11n frame.
    #[inline]
    pub fn is_11n(&self) -> bool {
        self.sig_mode != 0
    }

    /// Length of the received packet: `ht_length` for 11n frames,
    /// `legacy_length` otherwise. Never both.
    #[inline]
    pub fn packet_length(&self) -> u16 {
        if self.is_11n() {
            self.ht_length
        } else {
            self.legacy_length
        }
    }

    pub fn phy_mode(&self) -> PhyMode {
        if self.is_11n() {
            PhyMode::HighThroughput {
                mcs: self.mcs,
                ht40: self.cwb,
                short_gi: self.sgi,
                ldpc: self.fec_coding,
                stbc: self.stbc,
            }
        } else {
            PhyMode::Legacy { rate: self.rate }
        }
    }
}
