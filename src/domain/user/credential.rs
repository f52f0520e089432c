//! Stored password credentials

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a stored password value must be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialFormat {
    /// Salted one-way hash (Argon2 PHC string or bcrypt)
    Hashed,
    /// Plaintext password written before hashing was introduced
    LegacyPlaintext,
}

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

impl CredentialFormat {
    /// Classify a raw stored value that carries no explicit format
    pub fn detect(value: &str) -> Self {
        if value.starts_with("$argon2") || is_bcrypt_hash(value) {
            Self::Hashed
        } else {
            Self::LegacyPlaintext
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hashed => "hashed",
            Self::LegacyPlaintext => "legacy_plaintext",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hashed" => Some(Self::Hashed),
            "legacy_plaintext" => Some(Self::LegacyPlaintext),
            _ => None,
        }
    }
}

impl fmt::Display for CredentialFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a hash string is in bcrypt modular crypt format
pub fn is_bcrypt_hash(value: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}

/// A password as persisted in the credential store
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential {
    format: CredentialFormat,
    value: String,
}

impl StoredCredential {
    pub fn hashed(hash: impl Into<String>) -> Self {
        Self {
            format: CredentialFormat::Hashed,
            value: hash.into(),
        }
    }

    pub fn legacy_plaintext(password: impl Into<String>) -> Self {
        Self {
            format: CredentialFormat::LegacyPlaintext,
            value: password.into(),
        }
    }

    /// Rebuild a credential from storage, detecting the format when the row has none
    pub fn from_storage(value: impl Into<String>, format: Option<CredentialFormat>) -> Self {
        let value = value.into();
        let format = format.unwrap_or_else(|| CredentialFormat::detect(&value));
        Self { format, value }
    }

    pub fn format(&self) -> CredentialFormat {
        self.format
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_legacy(&self) -> bool {
        self.format == CredentialFormat::LegacyPlaintext
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("format", &self.format)
            .field("value", &"[hidden]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_argon2() {
        let hash = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$aGFzaA";
        assert_eq!(CredentialFormat::detect(hash), CredentialFormat::Hashed);
    }

    #[test]
    fn test_detect_bcrypt() {
        let hash = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";
        assert_eq!(CredentialFormat::detect(hash), CredentialFormat::Hashed);
        assert!(is_bcrypt_hash("$2b$12$abc"));
        assert!(is_bcrypt_hash("$2y$12$abc"));
    }

    #[test]
    fn test_detect_plaintext() {
        assert_eq!(
            CredentialFormat::detect("Passw0rd"),
            CredentialFormat::LegacyPlaintext
        );
        assert_eq!(
            CredentialFormat::detect("$1$md5crypt"),
            CredentialFormat::LegacyPlaintext
        );
    }

    #[test]
    fn test_format_round_trip_names() {
        for format in [CredentialFormat::Hashed, CredentialFormat::LegacyPlaintext] {
            assert_eq!(CredentialFormat::parse(format.as_str()), Some(format));
        }
        assert_eq!(CredentialFormat::parse("md5"), None);
    }

    #[test]
    fn test_from_storage_prefers_explicit_format() {
        // A plaintext password that happens to look like a hash stays plaintext
        // once the row records its format.
        let credential = StoredCredential::from_storage(
            "$argon2-looking-password1",
            Some(CredentialFormat::LegacyPlaintext),
        );
        assert!(credential.is_legacy());

        let detected = StoredCredential::from_storage("secret1", None);
        assert!(detected.is_legacy());
    }

    #[test]
    fn test_debug_hides_value() {
        let credential = StoredCredential::legacy_plaintext("Passw0rd");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("Passw0rd"));
        assert!(debug.contains("LegacyPlaintext"));
    }
}
