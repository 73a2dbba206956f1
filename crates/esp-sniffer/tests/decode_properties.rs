//! Integration tests for sniffer buffer decoding.
//!
//! Tests cover:
//! - The three reference scenarios (short legacy, long 11n, bad length)
//! - Length discrimination across arbitrary lengths
//! - Packet length selection by `sig_mode`
//! - Copy-out semantics of the `data` field

use esp_sniffer::{
    decode, FrameVariant, RxControl, SnifferParser, LONG_FRAME_LEN, SHORT_FRAME_LEN,
};

fn buffer_with(header: RxControl, total: usize, fill: u8) -> Vec<u8> {
    let mut buf = vec![fill; total];
    header.write_to(&mut buf);
    buf
}

#[cfg(test)]
mod scenarios {
    use super::*;

    fn header() -> RxControl {
        RxControl {
            rssi: -42,
            sig_mode: 0,
            legacy_length: 128,
            ht_length: 512,
            channel: 6,
            ..Default::default()
        }
    }

    #[test]
    fn test_short_legacy_frame() {
        let mut buf = buffer_with(header(), SHORT_FRAME_LEN, 0);
        for (i, b) in buf[12..48].iter_mut().enumerate() {
            *b = 0xA0 ^ i as u8;
        }

        let rec = decode(&buf, SHORT_FRAME_LEN).unwrap();
        assert_eq!(rec.rssi, -42);
        assert_eq!(rec.pktlen, 128);
        assert_eq!(rec.datalen, SHORT_FRAME_LEN);
        assert_eq!(rec.data, buf[12..48].to_vec());
    }

    #[test]
    fn test_long_ht_frame() {
        let h = RxControl {
            sig_mode: 1,
            ..header()
        };
        let buf = buffer_with(h, LONG_FRAME_LEN, 0x5C);

        let rec = decode(&buf, LONG_FRAME_LEN).unwrap();
        assert_eq!(rec.rssi, -42);
        assert_eq!(rec.pktlen, 512);
        assert_eq!(rec.datalen, LONG_FRAME_LEN);
        assert_eq!(rec.data, vec![0x5C; 112]);
    }

    #[test]
    fn test_length_ten_is_not_decodable() {
        assert!(decode(&[0u8; 10], 10).is_none());
    }

    #[test]
    fn test_channel_and_mcs_on_full_frame() {
        let h = RxControl {
            sig_mode: 1,
            mcs: 7,
            ..header()
        };
        let frame = SnifferParser::parse_frame(&buffer_with(h, LONG_FRAME_LEN, 0)).unwrap();
        assert_eq!(frame.channel(), 6);
        assert_eq!(frame.mcs(), Some(7));
    }
}

#[cfg(test)]
mod ownership {
    use super::*;

    #[test]
    fn test_record_outlives_buffer() {
        let rec = {
            let buf = buffer_with(RxControl::default(), SHORT_FRAME_LEN, 0x77);
            decode(&buf, buf.len()).unwrap()
        };
        assert_eq!(rec.data, vec![0x77; 36]);
    }

    #[test]
    fn test_mutating_record_leaves_input_untouched() {
        let buf = buffer_with(RxControl::default(), LONG_FRAME_LEN, 0x33);
        let mut a = decode(&buf, buf.len()).unwrap();
        let b = decode(&buf, buf.len()).unwrap();

        a.data.iter_mut().for_each(|x| *x = 0);

        assert_eq!(b.data, vec![0x33; 112]);
        assert!(buf[12..124].iter().all(|&x| x == 0x33));
        assert_eq!(decode(&buf, buf.len()).unwrap(), b);
    }

    #[test]
    fn test_concurrent_decodes() {
        let buf = std::sync::Arc::new(buffer_with(
            RxControl {
                rssi: -20,
                legacy_length: 99,
                ..Default::default()
            },
            SHORT_FRAME_LEN,
            1,
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let buf = buf.clone();
                std::thread::spawn(move || decode(&buf, buf.len()).unwrap())
            })
            .collect();

        for h in handles {
            let rec = h.join().unwrap();
            assert_eq!(rec.rssi, -20);
            assert_eq!(rec.pktlen, 99);
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn any_header() -> impl Strategy<Value = RxControl> {
        (
            any::<i8>(),
            0u8..4,
            0u16..0x1000,
            any::<u16>(),
            0u8..16,
            0u8..0x80,
        )
            .prop_map(|(rssi, sig_mode, legacy_length, ht_length, channel, mcs)| {
                RxControl {
                    rssi,
                    sig_mode,
                    legacy_length,
                    ht_length,
                    channel,
                    mcs,
                    ..Default::default()
                }
            })
    }

    proptest! {
        #[test]
        fn prop_unknown_lengths_yield_none(len in 0usize..512) {
            prop_assume!(len != SHORT_FRAME_LEN && len != LONG_FRAME_LEN);
            let buf = vec![0u8; len];
            prop_assert!(decode(&buf, len).is_none());
        }

        #[test]
        fn prop_header_fields_survive_packing(h in any_header()) {
            let mut bytes = [0u8; RxControl::SIZE];
            h.write_to(&mut bytes);
            prop_assert_eq!(RxControl::read_from(&bytes), Some(h));
        }

        #[test]
        fn prop_pktlen_follows_sig_mode(h in any_header(), long in any::<bool>()) {
            let total = if long { LONG_FRAME_LEN } else { SHORT_FRAME_LEN };
            let rec = decode(&buffer_with(h, total, 0), total).unwrap();

            let expected = if h.sig_mode != 0 { h.ht_length } else { h.legacy_length };
            prop_assert_eq!(rec.pktlen, expected);
            prop_assert_eq!(rec.rssi, h.rssi);
        }

        #[test]
        fn prop_data_is_verbatim_region(
            bytes in proptest::collection::vec(any::<u8>(), LONG_FRAME_LEN),
            long in any::<bool>(),
        ) {
            let total = if long { LONG_FRAME_LEN } else { SHORT_FRAME_LEN };
            let variant = FrameVariant::from_len(total).unwrap();
            let rec = decode(&bytes, total).unwrap();

            prop_assert_eq!(rec.datalen, total);
            prop_assert_eq!(rec.data.len(), variant.data_len());
            prop_assert_eq!(&rec.data[..], &bytes[12..12 + variant.data_len()]);
        }
    }
}
