//! ESP8266 promiscuous-mode sniffer buffer decoding.
//!
//! The ESP8266 firmware hands every frame captured in promiscuous mode to a
//! receive callback as a raw `(buf, len)` pair. This crate turns those
//! buffers into typed records:
//!
//! - **`RxControl`**: the 12-byte bit-packed radio metadata header (RSSI,
//!   rate, 11n PHY flags, lengths, channel)
//! - **`SnifferFrame`**: the full decode of a 60-byte `sniffer_buf` or a
//!   128-byte `sniffer_buf2`
//! - **`DecodedRecord`**: the flat `rssi` / `pktlen` / `data` / `datalen` view
//! - **`SnifferAggregator`**: a UDP receive loop for buffers forwarded by a
//!   relay node
//!
//! # Design Principles
//!
//! 1. **Explicit bit extraction**: header fields are pulled out with shifts
//!    and masks, never by overlaying a packed struct
//! 2. **Length is the tag**: the two layouts are told apart by exact total
//!    length; anything else decodes to `None`
//! 3. **Deterministic**: same bytes in, same record out; records own their
//!    data and never borrow from the receive buffer
//!
//! # Example
//!
//! ```rust
//! use esp_sniffer::{decode, RxControl, SHORT_FRAME_LEN};
//!
//! let mut buf = [0u8; SHORT_FRAME_LEN];
//! let header = RxControl { rssi: -42, legacy_length: 128, channel: 6, ..Default::default() };
//! header.write_to(&mut buf);
//!
//! match decode(&buf, buf.len()) {
//!     Some(record) => {
//!         assert_eq!(record.rssi, -42);
//!         assert_eq!(record.pktlen, 128);
//!         assert_eq!(record.data.len(), 36);
//!         assert_eq!(record.datalen, 60);
//!     }
//!     None => unreachable!("60-byte buffers are always decodable"),
//! }
//!
//! assert!(decode(&buf[..10], 10).is_none());
//! ```

pub mod aggregator;
mod error;
mod record;
mod rx_control;
mod sniffer_frame;
mod sniffer_parser;

pub use aggregator::{AggregatorConfig, CapturedRecord, ChannelStats, SnifferAggregator};
pub use error::ParseError;
pub use record::DecodedRecord;
pub use rx_control::{PhyMode, RxControl};
pub use sniffer_frame::{
    FrameVariant, LenSeq, SnifferFrame, SnifferPayload, LONG_DATA_LEN, LONG_FRAME_LEN,
    SHORT_DATA_LEN, SHORT_FRAME_LEN,
};
pub use sniffer_parser::{decode, SnifferParser};
