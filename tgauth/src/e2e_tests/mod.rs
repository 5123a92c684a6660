//! End-to-end tests at the HTTP handler level.
//!
//! Each test file covers a specific scenario, using a frozen clock and
//! deterministic inputs to drive the demo handlers through a complete login.

#![cfg(test)]

mod helpers;

mod test_fake_auth;
mod test_login_flow;
mod test_session_expiry;
mod test_session_tampering;
