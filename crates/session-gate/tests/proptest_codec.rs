//! Property-based tests for the session cookie codec.

use chrono::{DateTime, TimeDelta, Utc};
use proptest::prelude::*;
use proptest::sample::Index;

use session_gate::config::session::TTL;
use session_gate::session::{Session, SessionCodec};

const CURRENT: &str = "current-signing-key";
const PREVIOUS: &str = "previous-signing-key";

fn codec(keys: &[&str]) -> SessionCodec {
    SessionCodec::new(keys, TTL).expect("non-empty key list")
}

/// Issuance times spread over a few years around 2026, with sub-second noise.
fn arb_issued_at() -> impl Strategy<Value = DateTime<Utc>> {
    (1_700_000_000i64..1_900_000_000, 0u32..1_000_000_000)
        .prop_map(|(s, ns)| DateTime::from_timestamp(s, ns).unwrap())
}

fn arb_session() -> impl Strategy<Value = Session> {
    ("\\PC{1,48}", arb_issued_at()).prop_map(|(id, at)| Session::with_issued_at(id, at))
}

proptest! {
    /// decode(encode(S)) == S while the TTL has not elapsed.
    #[test]
    fn roundtrip_within_ttl(session in arb_session(), age in 0i64..86_400) {
        let codec = codec(&[CURRENT, PREVIOUS]);
        let now = session.issued_at() + TimeDelta::seconds(age);

        let value = codec.encode(&session);
        prop_assert_eq!(codec.decode_at(&value, now), Some(session));
    }

    /// Changing any single byte of the cookie value makes it undecodable.
    #[test]
    fn single_byte_tamper_rejected(
        session in arb_session(),
        position in any::<Index>(),
        replacement in 0x21u8..0x7f,
    ) {
        let codec = codec(&[CURRENT, PREVIOUS]);
        let now = session.issued_at();

        let mut bytes = codec.encode(&session).into_bytes();
        let i = position.index(bytes.len());
        prop_assume!(bytes[i] != replacement);
        bytes[i] = replacement;

        let tampered = String::from_utf8(bytes).unwrap();
        prop_assert_eq!(codec.decode_at(&tampered, now), None);
    }

    /// Sessions older than 24 hours are rejected even with a valid signature.
    #[test]
    fn expired_rejected(session in arb_session(), overshoot in 1i64..10_000_000) {
        let codec = codec(&[CURRENT]);
        let now = session.issued_at() + TimeDelta::seconds(86_400 + overshoot);

        let value = codec.encode(&session);
        prop_assert_eq!(codec.decode_at(&value, now), None);
    }

    /// A cookie signed with the previous key alone still decodes after rotation;
    /// one signed with an unrelated key does not.
    #[test]
    fn rotation_accepts_previous_key_only(session in arb_session(), stranger in "[a-z]{8,32}") {
        prop_assume!(stranger != CURRENT && stranger != PREVIOUS);
        let rotated = codec(&[CURRENT, PREVIOUS]);
        let now = session.issued_at();

        let old_value = codec(&[PREVIOUS]).encode(&session);
        prop_assert_eq!(rotated.decode_at(&old_value, now), Some(session.clone()));

        let foreign_value = codec(&[stranger.as_str()]).encode(&session);
        prop_assert_eq!(rotated.decode_at(&foreign_value, now), None);
    }

    /// Arbitrary strings never decode to a session.
    #[test]
    fn garbage_never_decodes(value in "\\PC{0,200}") {
        let codec = codec(&[CURRENT]);
        prop_assert_eq!(codec.decode_at(&value, Utc::now()), None);
    }
}
