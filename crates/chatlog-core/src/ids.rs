//! Generated identifiers for messages, array keys, and sessions.
//!
//! All ids are time + random. They are not guaranteed collision-free.

use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix of a generated array key.
const KEY_SUFFIX_LEN: usize = 9;

/// Message id for a widget event that carried none: `<millis>-<random>`.
pub fn message_id(now_millis: i64) -> String {
    let r: f64 = rand::thread_rng().gen_range(0.0..1.0);
    format!("{now_millis}-{r}")
}

/// Array item key for a stored conversation message without a message id:
/// `msg_<millis>_<9 base36 chars>`.
pub fn message_key(now_millis: i64) -> String {
    format!("msg_{now_millis}_{}", base36_suffix(KEY_SUFFIX_LEN))
}

/// Session identifier for a relay started without one:
/// `session-<millis>-<random>`.
pub fn session_id(now_millis: i64) -> String {
    let r: f64 = rand::thread_rng().gen_range(0.0..1.0);
    format!("session-{now_millis}-{r}")
}

fn base36_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
