use crate::core::error::ReportError;
use crate::core::vault::CredentialVault;

/// Environment variable holding the process-wide default credential.
pub const DEFAULT_KEY_ENV: &str = "QUILL_API_KEY";

/// Resolves the credential for backend calls. A user-supplied override
/// (stored in the vault) strictly wins over the process-wide default; empty
/// strings count as absent on both sides.
pub struct CredentialResolver {
    vault: CredentialVault,
    default_key: Option<String>,
}

impl CredentialResolver {
    pub fn new(vault: CredentialVault, default_key: Option<String>) -> Self {
        Self { vault, default_key }
    }

    pub fn from_env(vault: CredentialVault) -> Self {
        let default_key = std::env::var(DEFAULT_KEY_ENV).ok();
        Self::new(vault, default_key)
    }

    /// Resolve the effective credential. `MissingCredential` is a
    /// configuration problem for the user to fix, not something to retry.
    pub async fn resolve(&self) -> Result<String, ReportError> {
        if let Ok(Some(user_key)) = self.vault.get_override().await
            && !user_key.trim().is_empty()
        {
            return Ok(user_key);
        }
        match &self.default_key {
            Some(key) if !key.trim().is_empty() => Ok(key.clone()),
            _ => Err(ReportError::MissingCredential),
        }
    }

    /// Whether either source currently yields a credential, without
    /// exposing the value.
    pub async fn is_configured(&self) -> bool {
        self.resolve().await.is_ok()
    }
}
