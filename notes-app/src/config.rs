use std::env;
use std::time::Duration;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const GRAPHQL_ENDPOINT: &str = "NOTES_GRAPHQL_ENDPOINT";
    pub const AWS_REGION: &str = "NOTES_AWS_REGION";
    pub const COGNITO_CLIENT_ID: &str = "NOTES_COGNITO_CLIENT_ID";
    /// Override for the user pool endpoint (local identity fakes, VPC endpoints).
    pub const COGNITO_ENDPOINT: &str = "NOTES_COGNITO_ENDPOINT";
    pub const USERNAME: &str = "NOTES_USERNAME";
    pub const PASSWORD: &str = "NOTES_PASSWORD";
    /// Pre-issued id token. Takes precedence over username/password sign-in.
    pub const ID_TOKEN: &str = "NOTES_ID_TOKEN";
    pub const SIDE_CALL_URL: &str = "NOTES_SIDE_CALL_URL";
    pub const REQUEST_TIMEOUT_SECS: &str = "NOTES_REQUEST_TIMEOUT_SECS";
}

/// Default values
pub mod defaults {
    pub const AWS_REGION: &str = "us-east-2";
    pub const SIDE_CALL_URL: &str =
        "https://gavwmj3myf.execute-api.us-east-2.amazonaws.com/dev/docker-function-resource";
    pub const REQUEST_TIMEOUT_SECS: u64 = 15;
}

/// How the client obtains its session token.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthConfig {
    /// A token issued out of band (e.g. copied from a signed-in browser session).
    StaticToken { id_token: String },
    /// Username/password sign-in against the user pool.
    Cognito {
        endpoint: String,
        client_id: String,
        username: String,
        password: String,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub graphql_endpoint: String,
    pub region: String,
    pub auth: AuthConfig,
    pub side_call_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let graphql_endpoint = get(env_vars::GRAPHQL_ENDPOINT)
            .ok_or_else(|| format!("{} must be set", env_vars::GRAPHQL_ENDPOINT))?;
        validate_url(env_vars::GRAPHQL_ENDPOINT, &graphql_endpoint)?;

        let region = get(env_vars::AWS_REGION).unwrap_or_else(|| defaults::AWS_REGION.to_string());

        let auth = match get(env_vars::ID_TOKEN) {
            Some(id_token) => AuthConfig::StaticToken { id_token },
            None => {
                let client_id = get(env_vars::COGNITO_CLIENT_ID).ok_or_else(|| {
                    format!(
                        "Either {} or {} (with {} and {}) must be set",
                        env_vars::ID_TOKEN,
                        env_vars::COGNITO_CLIENT_ID,
                        env_vars::USERNAME,
                        env_vars::PASSWORD
                    )
                })?;
                let username = get(env_vars::USERNAME)
                    .ok_or_else(|| format!("{} must be set for sign-in", env_vars::USERNAME))?;
                let password = get(env_vars::PASSWORD)
                    .ok_or_else(|| format!("{} must be set for sign-in", env_vars::PASSWORD))?;
                let endpoint = get(env_vars::COGNITO_ENDPOINT)
                    .unwrap_or_else(|| cognito_endpoint_for(&region));
                validate_url(env_vars::COGNITO_ENDPOINT, &endpoint)?;

                AuthConfig::Cognito {
                    endpoint,
                    client_id,
                    username,
                    password,
                }
            }
        };

        let side_call_url =
            get(env_vars::SIDE_CALL_URL).unwrap_or_else(|| defaults::SIDE_CALL_URL.to_string());
        validate_url(env_vars::SIDE_CALL_URL, &side_call_url)?;

        let timeout_secs = match get(env_vars::REQUEST_TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    format!(
                        "{} must be a positive number of seconds, got '{}'",
                        env_vars::REQUEST_TIMEOUT_SECS,
                        raw
                    )
                })?,
            None => defaults::REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            graphql_endpoint,
            region,
            auth,
            side_call_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Regional user pool endpoint
pub fn cognito_endpoint_for(region: &str) -> String {
    format!("https://cognito-idp.{}.amazonaws.com/", region)
}

fn validate_url(name: &str, value: &str) -> Result<(), String> {
    let parsed = url::Url::parse(value).map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("{} must use http or https, got '{}'", name, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_static_token_config_uses_defaults() {
        let config = Config::from_lookup(lookup(&[
            (env_vars::GRAPHQL_ENDPOINT, "https://example.appsync-api.us-east-2.amazonaws.com/graphql"),
            (env_vars::ID_TOKEN, "header.payload.sig"),
        ]))
        .unwrap();

        assert_eq!(config.region, defaults::AWS_REGION);
        assert_eq!(config.side_call_url, defaults::SIDE_CALL_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(
            config.auth,
            AuthConfig::StaticToken {
                id_token: "header.payload.sig".to_string()
            }
        );
    }

    #[test]
    fn test_cognito_endpoint_follows_region() {
        let config = Config::from_lookup(lookup(&[
            (env_vars::GRAPHQL_ENDPOINT, "https://example.com/graphql"),
            (env_vars::AWS_REGION, "eu-west-1"),
            (env_vars::COGNITO_CLIENT_ID, "client"),
            (env_vars::USERNAME, "alice"),
            (env_vars::PASSWORD, "secret"),
        ]))
        .unwrap();

        match config.auth {
            AuthConfig::Cognito { endpoint, client_id, .. } => {
                assert_eq!(endpoint, "https://cognito-idp.eu-west-1.amazonaws.com/");
                assert_eq!(client_id, "client");
            }
            other => panic!("unexpected auth config: {:?}", other),
        }
    }

    #[test]
    fn test_missing_endpoint_is_rejected() {
        let err = Config::from_lookup(lookup(&[(env_vars::ID_TOKEN, "t")])).unwrap_err();
        assert!(err.contains(env_vars::GRAPHQL_ENDPOINT));
    }

    #[test]
    fn test_missing_credentials_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            (env_vars::GRAPHQL_ENDPOINT, "https://example.com/graphql"),
            (env_vars::COGNITO_CLIENT_ID, "client"),
            (env_vars::USERNAME, "alice"),
        ]))
        .unwrap_err();
        assert!(err.contains(env_vars::PASSWORD));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let err = Config::from_lookup(lookup(&[
            (env_vars::GRAPHQL_ENDPOINT, "https://example.com/graphql"),
            (env_vars::ID_TOKEN, "   "),
        ]))
        .unwrap_err();
        assert!(err.contains(env_vars::ID_TOKEN));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            (env_vars::GRAPHQL_ENDPOINT, "https://example.com/graphql"),
            (env_vars::ID_TOKEN, "t"),
            (env_vars::REQUEST_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(err.contains(env_vars::REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_non_http_endpoint_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            (env_vars::GRAPHQL_ENDPOINT, "ftp://example.com/graphql"),
            (env_vars::ID_TOKEN, "t"),
        ]))
        .unwrap_err();
        assert!(err.contains("http or https"));
    }
}
