//! API key lookup.
//!
//! Whether the host offers key management is decided once, at startup, by
//! [`KeyProvider::detect`]. Call sites then ask the selected provider for a key
//! and never query the host themselves.

use keyring::Entry;
use std::env;

/// Keyring service name under which studio keys are stored.
pub const KEYRING_SERVICE: &str = "voice-studio";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyProvider {
    /// The host manages keys: read from the OS keyring, then fall back to the environment.
    HostKeyring { service: String },
    /// The host offers no key management: read `<SERVICE>_API_KEY` from the environment.
    Environment { service: String },
}

impl KeyProvider {
    /// Selects the provider for `service` by reading its keyring entry once.
    ///
    /// Building an entry never touches the platform store, so only a real
    /// read tells whether the host manages keys. A missing entry still counts
    /// as a working keyring.
    pub fn detect(service: &str) -> Self {
        let lookup = Entry::new(KEYRING_SERVICE, service).and_then(|entry| entry.get_password());
        if host_manages_keys(&lookup) {
            tracing::debug!(service, "using host keyring for API keys");
            Self::HostKeyring {
                service: service.to_string(),
            }
        } else {
            if let Err(e) = &lookup {
                tracing::debug!(service, error = %e, "host keyring unavailable, using environment");
            }
            Self::Environment {
                service: service.to_string(),
            }
        }
    }

    pub fn environment(service: impl Into<String>) -> Self {
        Self::Environment {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        match self {
            Self::HostKeyring { service } | Self::Environment { service } => service,
        }
    }

    pub fn provides_key_management(&self) -> bool {
        matches!(self, Self::HostKeyring { .. })
    }

    /// Name of the environment variable consulted for this service.
    pub fn env_var_name(&self) -> String {
        format!("{}_API_KEY", self.service().to_uppercase().replace('-', "_"))
    }

    pub fn api_key(&self) -> Option<String> {
        if let Self::HostKeyring { service } = self {
            if let Some(key) = Entry::new(KEYRING_SERVICE, service)
                .ok()
                .and_then(|entry| entry.get_password().ok())
            {
                return Some(key);
            }
        }
        env::var(self.env_var_name()).ok().filter(|k| !k.is_empty())
    }

    /// Stores a key in the host keyring. Only the keyring variant can persist keys.
    pub fn store_api_key(&self, key: &str) -> crate::Result<()> {
        match self {
            Self::HostKeyring { service } => Entry::new(KEYRING_SERVICE, service)
                .and_then(|entry| entry.set_password(key))
                .map_err(|e| {
                    crate::Error::configuration_with_context(
                        format!("Failed to store API key: {}", e),
                        crate::ErrorContext::new().with_source("keyring"),
                    )
                }),
            Self::Environment { .. } => Err(crate::Error::configuration(format!(
                "Host provides no key management; set {} instead",
                self.env_var_name()
            ))),
        }
    }
}

/// Whether a keyring read shows a usable platform store.
fn host_manages_keys(lookup: &keyring::Result<String>) -> bool {
    !matches!(
        lookup,
        Err(keyring::Error::NoStorageAccess(_)) | Err(keyring::Error::PlatformFailure(_))
    )
}
