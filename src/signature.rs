use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

/// Builds the string the phone signs: the URL, every form field as
/// `,key=value` in ascending byte order of keys, then `,secret`.
pub fn signing_input<I, K, V>(url: &str, form: I, secret: &str) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = form.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_ref().as_bytes().cmp(b.0.as_ref().as_bytes()));

    let mut input = String::from(url);
    for (key, value) in &pairs {
        input.push(',');
        input.push_str(key.as_ref());
        input.push('=');
        input.push_str(value.as_ref());
    }
    input.push(',');
    input.push_str(secret);
    input
}

/// Base64 of the SHA-1 digest of [`signing_input`].
pub fn compute_signature<I, K, V>(url: &str, form: I, secret: &str) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let input = signing_input(url, form, secret);
    let digest = Sha1::digest(input.as_bytes());
    BASE64.encode(digest)
}

pub fn verify<I, K, V>(url: &str, form: I, secret: &str, presented: Option<&str>) -> bool
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let Some(presented) = presented.filter(|s| !s.is_empty()) else {
        return false;
    };
    let expected = compute_signature(url, form, secret);
    bool::from(expected.as_bytes().ct_eq(presented.as_bytes()))
}
