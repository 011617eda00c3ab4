//! Cache key derivation for ion configurations.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

use crate::ion::IonConfig;

/// Number of digest bytes kept in a key (16 hex characters).
const KEY_BYTES: usize = 8;

/// A 64-bit cache key: the leading bytes of the SHA-1 digest of an
/// [`IonConfig`]'s canonical string.
///
/// The key is a pure function of the configuration fields, so the same
/// configuration maps to the same file name in every run and on every
/// platform. Truncation means two configurations can collide; the artifact
/// header stores the canonical string so readers can detect that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey([u8; KEY_BYTES]);

impl CacheKey {
    /// Derives the key for a configuration.
    pub fn derive(config: &IonConfig) -> Self {
        Self::from_canonical(&config.canonical())
    }

    /// Derives the key from an already canonicalized configuration string.
    pub fn from_canonical(canonical: &str) -> Self {
        let digest = Sha1::digest(canonical.as_bytes());
        let mut bytes = [0u8; KEY_BYTES];
        bytes.copy_from_slice(&digest[..KEY_BYTES]);
        Self(bytes)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Error returned when a string is not a 16-character hex cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCacheKeyError(String);

impl fmt::Display for ParseCacheKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cache key '{}': expected 16 hex characters", self.0)
    }
}

impl std::error::Error for ParseCacheKeyError {}

impl FromStr for CacheKey {
    type Err = ParseCacheKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCacheKeyError(s.to_string());
        if s.len() != KEY_BYTES * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let mut bytes = [0u8; KEY_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| err())?;
        }
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ion::{MassType, Polarity};

    fn glucose_na() -> IonConfig {
        IonConfig::new(
            "Glucose",
            "[M+Na]+",
            Polarity::Positive.charge(),
            None::<&str>,
            MassType::Monoisotopic,
        )
    }

    #[test]
    fn deterministic() {
        let a = CacheKey::derive(&glucose_na());
        let b = CacheKey::derive(&glucose_na());
        assert_eq!(a, b);
    }

    #[test]
    fn matches_sha1_prefix_of_canonical_string() {
        // sha1("abc") = a9993e364706816aba3e25717850c26c9cd0d89d
        let key = CacheKey::from_canonical("abc");
        assert_eq!(key.to_string(), "a9993e364706816a");
    }

    #[test]
    fn compatible_with_existing_cache_layout() {
        // Key of `Glucose|[M+Na]+|1||0` as written by earlier cache builds.
        assert_eq!(CacheKey::derive(&glucose_na()).to_string(), "68519da30d2460d5");
    }

    #[test]
    fn every_field_changes_the_key() {
        let base = glucose_na();
        let variants = [
            IonConfig::new("Fructose", "[M+Na]+", 1, None::<&str>, MassType::Monoisotopic),
            IonConfig::new("Glucose", "[M+K]+", 1, None::<&str>, MassType::Monoisotopic),
            IonConfig::new("Glucose", "[M+Na]+", -1, None::<&str>, MassType::Monoisotopic),
            IonConfig::new("Glucose", "[M+Na]+", 1, Some("(13C)"), MassType::Monoisotopic),
            IonConfig::new("Glucose", "[M+Na]+", 1, None::<&str>, MassType::Average),
        ];
        let base_key = CacheKey::derive(&base);
        for variant in &variants {
            assert_ne!(CacheKey::derive(variant), base_key, "{}", variant.canonical());
        }
    }

    #[test]
    fn display_is_sixteen_hex_chars() {
        let s = CacheKey::derive(&glucose_na()).to_string();
        assert_eq!(s.len(), 16);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn parse_display_roundtrip() {
        let key = CacheKey::derive(&glucose_na());
        let parsed: CacheKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("abc".parse::<CacheKey>().is_err());
        assert!("zzzzzzzzzzzzzzzz".parse::<CacheKey>().is_err());
        assert!("0123456789abcdef0".parse::<CacheKey>().is_err());
        assert!("+123456789abcdef".parse::<CacheKey>().is_err());
    }

    #[test]
    fn debug_abbreviated() {
        let s = format!("{:?}", CacheKey::derive(&glucose_na()));
        assert!(s.starts_with("CacheKey("));
        assert!(s.ends_with("..)"));
    }
}
