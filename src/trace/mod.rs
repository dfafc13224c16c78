//! Trace identifier generation.
//!
//! Every relayed exchange gets a random URL-safe identifier. The same value
//! is returned to the caller, attached to the outbound request as a header,
//! and used as the traffic log key, so one exchange can be followed across
//! all three.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Length of the identifiers used to correlate relay exchanges.
pub const TRACE_ID_LENGTH: usize = 32;

/// Generate a trace identifier of [`TRACE_ID_LENGTH`] characters.
pub fn generate() -> String {
    generate_with_length(TRACE_ID_LENGTH)
}

/// Generate a random identifier of exactly `length` characters drawn from
/// the base64 alphabet (`A-Z a-z 0-9 + /`, no padding).
///
/// Returns the empty string when `length` is zero or the system random
/// source fails. A failure is logged, never propagated; callers must treat
/// an empty result as a failed generation rather than a zero-length request.
pub fn generate_with_length(length: usize) -> String {
    if length == 0 {
        return String::new();
    }

    // Base64 expands 3 bytes into 4 characters; the two extra bytes cover
    // the rounding so truncation never comes up short.
    let size = length * 3 / 4 + 2;
    let mut data = vec![0u8; size];
    if let Err(err) = OsRng.try_fill_bytes(&mut data) {
        tracing::error!(%err, "system random source failed");
        return String::new();
    }

    let mut id = STANDARD_NO_PAD.encode(&data);
    id.truncate(length);
    id
}
