use base64::{Engine as _, engine::general_purpose::STANDARD};
use md5::{Digest, Md5};

/// Content digest of a database entry: base64 of the MD5 over its fields.
///
/// Fields are separated with a NUL byte so that `("ab", "c")` and
/// `("a", "bc")` digest differently.
pub fn content_digest<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Md5::new();
    for field in fields {
        hasher.update(field.as_ref().as_bytes());
        hasher.update([0u8]);
    }
    STANDARD.encode(hasher.finalize())
}

/// Format a number the same way on every platform before digesting it.
pub fn digest_number(value: f64) -> String {
    format!("{value:.6e}")
}
