//! Debugger option-string parsing.
//!
//! The host hands each front-end one free-form argument string at
//! initialization. The only recognized option is `port=<decimal>`, matched
//! anywhere in the string; everything else is ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Port the wire front-end listens on when the options say nothing else.
pub const DEFAULT_PORT: u16 = 1234;

static PORT_OPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"port=(\d+)").unwrap());

/// Extract the listen port from a debugger option string. Out-of-range
/// values fall back to the default.
pub fn port_from_options(options: &str) -> u16 {
    match PORT_OPTION.captures(options) {
        Some(caps) => match caps[1].parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                warn!(value = &caps[1], "port option out of range, using default");
                DEFAULT_PORT
            }
        },
        None => DEFAULT_PORT,
    }
}
