//! Identifier policy - blog ids are random (version 4) UUIDs.
//!
//! Ids are minted only by Create and validated before any store access in
//! Read, Update and Delete, so a malformed id never reaches a backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::{Uuid, Variant, Version};

/// A validated UUIDv4 blog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlogId(Uuid);

/// The supplied id is not a textual UUIDv4.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} (got {input:?})")]
pub struct MalformedIdentifier {
    pub input: String,
    pub reason: String,
}

impl BlogId {
    /// Mint a new id. No uniqueness check is made against the store.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validate a caller-supplied id.
    pub fn parse(input: &str) -> Result<Self, MalformedIdentifier> {
        let malformed = |reason: String| MalformedIdentifier {
            input: input.to_string(),
            reason,
        };

        let uuid = Uuid::parse_str(input).map_err(|e| malformed(e.to_string()))?;

        if uuid.get_version() != Some(Version::Random) {
            return Err(malformed(format!(
                "expected UUID version 4, found version {}",
                uuid.get_version_num()
            )));
        }
        if uuid.get_variant() != Variant::RFC4122 {
            return Err(malformed("expected RFC 4122 variant".to_string()));
        }

        Ok(Self(uuid))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlogId {
    type Err = MalformedIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BlogId {
    type Error = MalformedIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<Uuid> for BlogId {
    type Error = MalformedIdentifier;

    fn try_from(value: Uuid) -> Result<Self, Self::Error> {
        Self::parse(&value.to_string())
    }
}

impl From<BlogId> for String {
    fn from(id: BlogId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_v4() {
        let id = BlogId::generate();
        assert_eq!(id.as_uuid().get_version(), Some(Version::Random));
        assert_eq!(BlogId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_generate_is_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| BlogId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_parse_accepts_known_v4() {
        let id = BlogId::parse("6b276f60-56cc-41bb-b0d5-cc9a94bd678c").unwrap();
        assert_eq!(id.to_string(), "6b276f60-56cc-41bb-b0d5-cc9a94bd678c");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = BlogId::parse("FORCEANERROR").unwrap_err();
        assert_eq!(err.input, "FORCEANERROR");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(BlogId::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_other_versions() {
        // v1 (time-based)
        assert!(BlogId::parse("c232ab00-9414-11ec-b3c8-9f6bdeced846").is_err());
        // nil
        assert!(BlogId::parse("00000000-0000-0000-0000-000000000000").is_err());
    }
}
