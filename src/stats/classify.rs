//! Namespace classification
//!
//! Application keys follow the convention `s/k:<module>/<rest>`, where
//! `<module>` is a run of ASCII word characters. Everything else is filed
//! under [`MISC_LABEL`].

use tracing::trace;

use crate::error::MalformedKeyError;

/// Label for keys outside the namespace convention
pub const MISC_LABEL: &str = "misc";

/// Literal prefix of a namespaced key
const NAMESPACE_PREFIX: &[u8] = b"s/k:";

/// Terminator of the module name
const NAMESPACE_DELIMITER: u8 = b'/';

/// Parse the module name out of a key
///
/// - `Ok(Some(name))` for `s/k:<name>/...`
/// - `Ok(None)` when the key does not start with `s/k:`
/// - `Err(_)` when it does, but no `<name>/` follows
pub fn parse_namespace(key: &[u8]) -> Result<Option<&str>, MalformedKeyError> {
    let Some(body) = key.strip_prefix(NAMESPACE_PREFIX) else {
        return Ok(None);
    };

    let name_len = body.iter().take_while(|&&b| is_word_byte(b)).count();
    if name_len == 0 {
        return Err(MalformedKeyError {
            reason: "empty module name",
        });
    }
    if body.get(name_len) != Some(&NAMESPACE_DELIMITER) {
        return Err(MalformedKeyError {
            reason: "module name not terminated by '/'",
        });
    }

    // Word bytes are ASCII, so this cannot fail.
    std::str::from_utf8(&body[..name_len])
        .map(Some)
        .map_err(|_| MalformedKeyError {
            reason: "module name is not valid UTF-8",
        })
}

/// Namespace label of a key; malformed namespaced keys fall back to `misc`
pub fn classify(key: &[u8]) -> &str {
    classify_checked(key).0
}

/// [`classify`], also reporting whether the key had a malformed namespace prefix
pub(crate) fn classify_checked(key: &[u8]) -> (&str, bool) {
    match parse_namespace(key) {
        Ok(Some(name)) => (name, false),
        Ok(None) => (MISC_LABEL, false),
        Err(e) => {
            trace!(key = %key.escape_ascii(), error = %e, "classifying as misc");
            (MISC_LABEL, true)
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
