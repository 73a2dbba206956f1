//! ESP8266 sniffer buffer parser.
//!
//! The promiscuous-mode receive callback is invoked with `(buf, len)`. The
//! firmware uses two fixed layouts, `sniffer_buf` (60 bytes) and
//! `sniffer_buf2` (128 bytes); anything else, such as the bare 12-byte
//! `RxControl` emitted for frames received with errors, is not decodable.
//!
//! Parsing is a pure function of the input bytes. The header region is
//! copied out, so the result stays valid after the firmware reuses the
//! receive buffer.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read};

use crate::error::ParseError;
use crate::record::DecodedRecord;
use crate::rx_control::RxControl;
use crate::sniffer_frame::{
    FrameVariant, LenSeq, SnifferFrame, SnifferPayload, LONG_DATA_LEN, SHORT_DATA_LEN,
};

/// Parser for ESP8266 sniffer buffers.
pub struct SnifferParser;

impl SnifferParser {
    /// Parse a complete sniffer buffer.
    ///
    /// `data.len()` selects the layout; it must be exactly 60 or 128.
    pub fn parse_frame(data: &[u8]) -> Result<SnifferFrame, ParseError> {
        let variant = FrameVariant::from_len(data.len())
            .ok_or(ParseError::UnrecognizedLength { got: data.len() })?;

        let header = RxControl::read_from(data).ok_or(ParseError::InsufficientData {
            needed: RxControl::SIZE,
            got: data.len(),
        })?;

        let truncated = |_: io::Error| ParseError::InsufficientData {
            needed: variant.total_len(),
            got: data.len(),
        };

        let mut cursor = Cursor::new(&data[RxControl::SIZE..]);
        let payload = match variant {
            FrameVariant::Short => {
                let mut buf = [0u8; SHORT_DATA_LEN];
                cursor.read_exact(&mut buf).map_err(truncated)?;
                let cnt = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
                let len = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
                let seq = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
                let mut addr3 = [0u8; 6];
                cursor.read_exact(&mut addr3).map_err(truncated)?;

                SnifferPayload::Short {
                    data: buf,
                    cnt,
                    len_seq: LenSeq { len, seq, addr3 },
                }
            }
            FrameVariant::Long => {
                let mut buf = [0u8; LONG_DATA_LEN];
                cursor.read_exact(&mut buf).map_err(truncated)?;
                let cnt = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
                let len = cursor.read_u16::<LittleEndian>().map_err(truncated)?;

                SnifferPayload::Long { data: buf, cnt, len }
            }
        };

        Ok(SnifferFrame { header, payload })
    }

    /// Parse the first `length` bytes of `buffer`.
    ///
    /// Fails with `InsufficientData` rather than reading past the end when
    /// `buffer` is shorter than `length`.
    pub fn parse_prefix(buffer: &[u8], length: usize) -> Result<SnifferFrame, ParseError> {
        let data = buffer.get(..length).ok_or(ParseError::InsufficientData {
            needed: length,
            got: buffer.len(),
        })?;
        Self::parse_frame(data)
    }
}

/// Decode a receive-callback buffer into a [`DecodedRecord`].
///
/// Returns `None` when `length` matches neither sniffer layout or when
/// `buffer` holds fewer than `length` bytes. `None` is an expected outcome
/// for errored or unknown captures and should be skipped, not reported.
pub fn decode(buffer: &[u8], length: usize) -> Option<DecodedRecord> {
    SnifferParser::parse_prefix(buffer, length)
        .ok()
        .map(DecodedRecord::from)
}
