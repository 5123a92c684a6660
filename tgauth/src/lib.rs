// Life of a login:
// 1. The login widget redirects to the check-auth URL with the assertion fields
// 2. Verify the fields against the bot token and the freshness window
// 3. Encode the fields into a session cookie and redirect home
//
// Life of a later request:
// 1. Read the session cookie and decode it back into fields
// 2. Verify the fields again (the cookie carries no signature of its own)
// 3. Project the fields into a VerifiedIdentity
//
// System components:
//  - Verifier (canonicalization + HMAC-SHA256 + freshness)
//  - Session codec (JSON + percent-escaping)
//  - TelegramAuth provider tying both to HTTP headers

pub mod auth;
pub mod config;
mod e2e_tests;
pub mod testing;
pub mod time;
pub mod web;
