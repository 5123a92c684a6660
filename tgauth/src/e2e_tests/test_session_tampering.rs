//! Test that altered or forged session cookies never grant access.
//!
//! Session tokens carry no signature. They are safe only because every request
//! re-verifies the decoded fields against the bot token. These tests pin that
//! behavior: a token that decodes fine is still rejected unless the issuer's
//! hash inside it matches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::auth::{AuthError, IdentityFields, TelegramAuth, decode, encode, verify};
use crate::e2e_tests::helpers::*;

fn tampered(token: &str, index: usize, replacement: char) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    chars[index] = replacement;
    chars.into_iter().collect()
}

fn replacement_for(c: char) -> char {
    match c {
        'x' => 'y',
        _ => 'x',
    }
}

#[test]
fn test_every_single_character_tamper_is_caught() {
    let original = signed_fields(AUTH_DATE);
    let token = encode(&original, secs(DAY_SECS), AUTH_DATE).value;
    let secret = auth_config();

    for index in 0..token.chars().count() {
        let original_char = token.chars().nth(index).unwrap_or_default();
        let forged = tampered(&token, index, replacement_for(original_char));

        match decode(&forged) {
            Err(AuthError::MalformedToken(_)) => {}
            Err(other) => panic!("unexpected error at {index}: {other}"),
            Ok(fields) if fields == original => {}
            Ok(fields) => {
                let result = verify(
                    &fields,
                    secret.bot_token(),
                    AUTH_DATE,
                    secs(DAY_SECS),
                    secret.diagnostics(),
                );
                assert!(result.is_err(), "tamper at {index} accepted: {forged}");
            }
        }
    }
}

#[test]
fn test_random_tampers_never_reach_index() {
    let server = TestServer::at(AUTH_DATE);
    let login = server.login(&signed_fields(AUTH_DATE));
    let cookie = session_cookie(&login).expect("session cookie issued");
    let (name, token) = cookie.split_once('=').expect("name=value");

    let alphabet: Vec<char> = "abcdefxyzABCDEF0123456789%-_.~".chars().collect();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let index = rng.random_range(0..token.len());
        let replacement = alphabet[rng.random_range(0..alphabet.len())];
        let forged = tampered(token, index, replacement);
        if decode(&forged).is_ok_and(|fields| fields == signed_fields(AUTH_DATE)) {
            continue;
        }

        let response = server.visit_index(Some(&format!("{name}={forged}")));
        assert_redirects_to_login(&response);
    }
}

#[test]
fn test_forged_cookie_decodes_but_is_rejected() {
    let server = TestServer::at(AUTH_DATE);
    let auth = &server.state.auth;

    // An attacker who can write the cookie can make it say anything.
    let mut forged = signed_fields(AUTH_DATE);
    forged.insert("id", "1");
    forged.insert("username", "admin");
    let token = encode(&forged, secs(DAY_SECS), AUTH_DATE).value;

    let decoded = auth
        .params_from_cookie_value(&token)
        .expect("the codec performs no integrity check");
    assert_eq!(decoded, forged);
    assert_eq!(auth.check_auth(&decoded), Err(AuthError::HashMismatch));

    let response = server.visit_index(Some(&format!("tg_auth={token}")));
    assert_redirects_to_login(&response);
}

#[test]
fn test_forged_cookie_without_hash_is_rejected() {
    let server = TestServer::at(AUTH_DATE);
    let forged = IdentityFields::from([
        ("id", "1"),
        ("username", "admin"),
        ("auth_date", "1234567890"),
    ]);
    let token = encode(&forged, secs(DAY_SECS), AUTH_DATE).value;

    assert_eq!(
        server.state.auth.check_auth(&forged),
        Err(AuthError::MissingField("hash"))
    );
    let response = server.visit_index(Some(&format!("tg_auth={token}")));
    assert_redirects_to_login(&response);
}

#[test]
fn test_garbage_cookie_redirects() {
    let server = TestServer::at(AUTH_DATE);
    for value in ["", "not-json", "%7B", "%FF"] {
        let response = server.visit_index(Some(&format!("tg_auth={value}")));
        assert_redirects_to_login(&response);
    }
}
