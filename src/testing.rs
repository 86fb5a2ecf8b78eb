//! Helpers for exercising the client against a local mock server.

use crate::{Client, Config};

/// Create an unauthenticated client pointing at `base_url`.
/// Download links are rooted at `{base_url}/download`.
pub fn test_client(base_url: &str) -> Client {
    Client::new(test_config(base_url)).expect("client")
}

/// Create a client pointing at `base_url` that authenticates with `token`.
pub fn test_client_with_token(base_url: &str, token: &str) -> Client {
    Client::new(test_config(base_url).with_api_token(token)).expect("client")
}

fn test_config(base_url: &str) -> Config {
    Config {
        base_url: Some(base_url.to_string()),
        download_base_url: Some(format!("{}/download", base_url.trim_end_matches('/'))),
        ..Default::default()
    }
}
