use kalsms::signature::{compute_signature, signing_input, verify};
use std::collections::{BTreeMap, HashMap};

const URL: &str = "http://example.com/kalsms";

fn form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("version", "1"),
        ("action", "outgoing"),
        ("phone_number", "+15550001111"),
    ]
}

#[test]
fn test_known_signature() {
    // Reference value computed outside this crate.
    assert_eq!(
        compute_signature(URL, form(), "secret"),
        "h9GmHsHnHEiYEU6Ba0VG6QmriBI="
    );
}

#[test]
fn test_scheme_changes_signature() {
    assert_eq!(
        compute_signature("https://example.com/kalsms", form(), "secret"),
        "p5hs9L5MNU2f39xmW1tJ8GNwnu8="
    );
}

#[test]
fn test_order_invariance() {
    let mut reversed = form();
    reversed.reverse();
    let hashed: HashMap<_, _> = form().into_iter().collect();
    let sorted: BTreeMap<_, _> = form().into_iter().collect();

    let expected = compute_signature(URL, form(), "secret");
    assert_eq!(compute_signature(URL, reversed, "secret"), expected);
    assert_eq!(compute_signature(URL, &hashed, "secret"), expected);
    assert_eq!(compute_signature(URL, &sorted, "secret"), expected);
}

#[test]
fn test_signing_input_layout() {
    assert_eq!(
        signing_input(URL, form(), "secret"),
        "http://example.com/kalsms,action=outgoing,phone_number=+15550001111,version=1,secret"
    );
}

#[test]
fn test_empty_form() {
    assert_eq!(
        compute_signature("u", Vec::<(&str, &str)>::new(), "s"),
        "BbZI8/xPQbAda64K80vRAHfd3UM="
    );
}

#[test]
fn test_verify_accepts_matching() {
    assert!(verify(URL, form(), "secret", Some("h9GmHsHnHEiYEU6Ba0VG6QmriBI=")));
}

#[test]
fn test_verify_rejects_wrong_secret() {
    let sig = compute_signature(URL, form(), "other");
    assert!(!verify(URL, form(), "secret", Some(&sig)));
}

#[test]
fn test_verify_rejects_tampered_field() {
    let sig = compute_signature(URL, form(), "secret");
    let mut tampered = form();
    tampered[1] = ("action", "incoming");
    assert!(!verify(URL, tampered, "secret", Some(&sig)));
}

#[test]
fn test_verify_absent_or_empty() {
    assert!(!verify(URL, form(), "secret", None));
    assert!(!verify(URL, form(), "secret", Some("")));
    assert!(!verify(URL, Vec::<(&str, &str)>::new(), "", Some("")));
}
