use secrecy::SecretString;

/// Which authentication scheme a request goes out with.
///
/// Marker enum (no data) -- the secret material lives in [`Credentials`]
/// and in the client's bearer-token slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// HTTP Basic, API key as username, empty password.
    Basic,
    /// `Authorization: Bearer <token>`.
    Bearer,
}

/// Credentials a [`TailnetClient`](crate::TailnetClient) is constructed with.
///
/// Exactly one variant, so a client can never hold "API key and token" or
/// "nothing at all" as its configured credential.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Long-lived API key.
    /// Generated at: <https://login.tailscale.com/admin/settings/keys>.
    ApiKey(SecretString),

    /// OAuth client. Requests fail with
    /// [`Error::MissingCredentials`](crate::Error::MissingCredentials) until
    /// [`get_oauth_token`](crate::TailnetClient::get_oauth_token) succeeds.
    OAuth {
        client_id: String,
        client_secret: SecretString,
    },

    /// A bearer token obtained elsewhere.
    Bearer(SecretString),
}

impl Credentials {
    /// Build API-key credentials from a plain string.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(SecretString::from(key.into()))
    }

    /// Build OAuth client credentials from plain strings.
    pub fn oauth(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::OAuth {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// The strategy requests will use before any OAuth exchange happens.
    ///
    /// `None` for [`OAuth`](Self::OAuth): there is nothing to send yet.
    pub fn initial_strategy(&self) -> Option<AuthStrategy> {
        match self {
            Self::ApiKey(_) => Some(AuthStrategy::Basic),
            Self::Bearer(_) => Some(AuthStrategy::Bearer),
            Self::OAuth { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_strategy_per_variant() {
        assert_eq!(
            Credentials::api_key("abc").initial_strategy(),
            Some(AuthStrategy::Basic)
        );
        assert_eq!(
            Credentials::Bearer(SecretString::from("tok")).initial_strategy(),
            Some(AuthStrategy::Bearer)
        );
        assert_eq!(Credentials::oauth("id", "secret").initial_strategy(), None);
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", Credentials::oauth("client-1", "super-secret"));
        assert!(rendered.contains("client-1"));
        assert!(!rendered.contains("super-secret"));
    }
}
