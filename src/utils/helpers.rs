use chrono::{DateTime, Utc};
use rand::Rng;

const TX_REF_PREFIX: &str = "VA";
const TX_REF_SUFFIX_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TX_REF_SUFFIX_LEN: usize = 4;

/// Builds a transaction reference such as `VA_20240102030405678k3x9`.
///
/// Uniqueness is best-effort only: a millisecond timestamp plus a short
/// random suffix. Nothing checks it.
pub fn generate_tx_ref() -> String {
    tx_ref_at(TX_REF_PREFIX, Utc::now(), &mut rand::thread_rng())
}

fn tx_ref_at<R: Rng>(prefix: &str, now: DateTime<Utc>, rng: &mut R) -> String {
    let timestamp = now.format("%Y%m%d%H%M%S%3f");
    let suffix: String = (0..TX_REF_SUFFIX_LEN)
        .map(|_| TX_REF_SUFFIX_CHARSET[rng.gen_range(0..TX_REF_SUFFIX_CHARSET.len())] as char)
        .collect();

    format!("{prefix}_{timestamp}{suffix}")
}
