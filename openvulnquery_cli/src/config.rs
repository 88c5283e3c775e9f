//! Credential and endpoint resolution for the CLI.
//!
//! Credentials come from a JSON config file (`--config`) holding `CLIENT_ID`
//! and `CLIENT_SECRET`, or from the environment variables of the same names.
//! A `.env` file in the working directory is loaded before either is read.

use std::path::Path;

use anyhow::{bail, Context, Result};
use openvulnquery_api::{ClientConfig, Credentials};
use serde::Deserialize;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";
pub const API_URL_VAR: &str = "OPENVULN_API_URL";
pub const TOKEN_URL_VAR: &str = "OPENVULN_TOKEN_URL";

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(rename = "CLIENT_ID")]
    client_id: String,
    #[serde(rename = "CLIENT_SECRET")]
    client_secret: String,
}

fn parse_config(contents: &str) -> Result<Credentials> {
    let file: ConfigFile = serde_json::from_str(contents)
        .context("config must be a JSON object with CLIENT_ID and CLIENT_SECRET")?;
    if file.client_id.trim().is_empty() || file.client_secret.trim().is_empty() {
        bail!("CLIENT_ID and CLIENT_SECRET must not be empty");
    }
    Ok(Credentials::new(file.client_id.trim(), file.client_secret.trim()))
}

fn env_credentials() -> Option<Credentials> {
    let client_id = std::env::var(CLIENT_ID_VAR).ok()?;
    let client_secret = std::env::var(CLIENT_SECRET_VAR).ok()?;
    if client_id.trim().is_empty() || client_secret.trim().is_empty() {
        return None;
    }
    Some(Credentials::new(client_id.trim(), client_secret.trim()))
}

/// Resolves credentials: the config file when given, otherwise the environment.
pub fn load_credentials(config_path: Option<&Path>) -> Result<Credentials> {
    if let Some(path) = config_path {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        return parse_config(&contents)
            .with_context(|| format!("invalid config file {}", path.display()));
    }
    env_credentials().with_context(|| {
        format!(
            "no credentials: pass --config <file> or set {} and {}",
            CLIENT_ID_VAR, CLIENT_SECRET_VAR
        )
    })
}

/// Endpoint configuration with environment overrides applied.
pub fn client_config(user_agent: &str) -> ClientConfig {
    let mut config = ClientConfig::default().with_user_agent(user_agent);
    if let Ok(api_url) = std::env::var(API_URL_VAR) {
        config = config.with_api_url(&api_url);
    }
    if let Ok(token_url) = std::env::var(TOKEN_URL_VAR) {
        config = config.with_token_url(&token_url);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config() {
        let creds = parse_config(r#"{"CLIENT_ID": "abc", "CLIENT_SECRET": "xyz"}"#).unwrap();
        assert_eq!(creds.client_id, "abc");
        assert_eq!(creds.client_secret, "xyz");
    }

    #[test]
    fn parse_config_missing_secret() {
        assert!(parse_config(r#"{"CLIENT_ID": "abc"}"#).is_err());
    }

    #[test]
    fn parse_config_empty_values() {
        assert!(parse_config(r#"{"CLIENT_ID": " ", "CLIENT_SECRET": "xyz"}"#).is_err());
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "openvulnquery-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"CLIENT_ID": "file-id", "CLIENT_SECRET": "file-secret"}"#)
            .unwrap();
        let creds = load_credentials(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(creds.client_id, "file-id");
    }

    #[test]
    fn load_from_missing_file_names_path() {
        let path = Path::new("/nonexistent/openvulnquery.json");
        let err = load_credentials(Some(path)).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/openvulnquery.json"));
    }

    #[test]
    fn debug_output_hides_secret() {
        let creds = parse_config(r#"{"CLIENT_ID": "abc", "CLIENT_SECRET": "xyz"}"#).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("abc"));
        assert!(!debug.contains("xyz"));
    }
}
