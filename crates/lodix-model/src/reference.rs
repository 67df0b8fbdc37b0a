use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 5;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Opaque storage id for any document.
#[must_use]
pub fn document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Human-facing order reference, `ORD-{unix_millis}-{5 chars}`.
#[must_use]
pub fn order_number() -> String {
    tagged("ORD")
}

/// Human-facing shipment reference, `SHP-{unix_millis}-{5 chars}`.
#[must_use]
pub fn shipment_number() -> String {
    tagged("SHP")
}

/// Human-facing carrier reference, `CAR-{unix_millis}-{5 chars}`.
#[must_use]
pub fn carrier_reference() -> String {
    tagged("CAR")
}

// Timestamp plus random suffix keeps these readable; exact-once uniqueness
// lives with the UUID document id, not here.
fn tagged(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}-{}-{suffix}", Utc::now().timestamp_millis())
}
