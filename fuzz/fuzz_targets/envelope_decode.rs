//! Fuzz target for envelope decoding
//!
//! Feeds arbitrary text to both decoders. Decoding must never panic, and
//! anything that decodes must re-encode to an envelope that decodes to the
//! same event.

#![no_main]

use libfuzzer_sys::fuzz_target;
use livechat_proto::Envelope;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(event) = Envelope::decode_inbound(text) {
        let encoded = Envelope::encode_inbound(&event).expect("decoded event must encode");
        let again = Envelope::decode_inbound(&encoded).expect("re-encoded event must decode");
        assert_eq!(again, event);
    }

    if let Ok((role, event)) = Envelope::decode_outbound(text) {
        let encoded = Envelope::encode_outbound(&event, role).expect("decoded event must encode");
        let again = Envelope::decode_outbound(&encoded).expect("re-encoded event must decode");
        assert_eq!(again, (role, event));
    }
});
