//! Cloud API key pair with redacted formatting and zeroed storage on drop.
//!
//! ```rust
//! use hprovider::Credentials;
//!
//! let credentials = Credentials::new("AKIDexample", "secret-key").expect("non-empty pair");
//! assert_eq!(credentials.secret_id(), "AKIDexample");
//! assert!(!format!("{credentials:?}").contains("secret-key"));
//! ```

use crate::ProviderError;

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// `SecretId` / `SecretKey` pair used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    secret_id: String,
    secret_key: SecretString,
}

impl Credentials {
    pub fn new(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let secret_id = secret_id.into();
        let secret_key = SecretString::new(secret_key);

        if secret_id.trim().is_empty() {
            return Err(ProviderError::configuration("secret id must not be empty"));
        }

        if secret_key.is_empty() {
            return Err(ProviderError::configuration("secret key must not be empty"));
        }

        Ok(Self {
            secret_id,
            secret_key,
        })
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &self.secret_key)
            .finish()
    }
}
