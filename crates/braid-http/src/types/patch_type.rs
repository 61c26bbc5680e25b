//! Patch-type hint advertised to the peer.

use crate::protocol::constants::patch_types;

/// How the peer should interpret each patch.
///
/// Only ever written into headers; the stream itself never applies patches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PatchType {
    /// Every patch replaces the whole state.
    #[default]
    FullSnapshot,
    /// Every patch is an object merged into the state.
    MergeObject,
    /// Application-defined patch format.
    Custom(String),
}

impl PatchType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PatchType::FullSnapshot => patch_types::FULL_SNAPSHOT,
            PatchType::MergeObject => patch_types::MERGE_OBJECT,
            PatchType::Custom(s) => s,
        }
    }
}

impl std::fmt::Display for PatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PatchType {
    fn from(s: &str) -> Self {
        match s {
            patch_types::FULL_SNAPSHOT => PatchType::FullSnapshot,
            patch_types::MERGE_OBJECT => PatchType::MergeObject,
            other => PatchType::Custom(other.to_string()),
        }
    }
}

impl From<String> for PatchType {
    fn from(s: String) -> Self {
        PatchType::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_patch_types() {
        assert_eq!(PatchType::from("merge-object"), PatchType::MergeObject);
        assert_eq!(PatchType::from("full-snapshot"), PatchType::FullSnapshot);
        assert_eq!(PatchType::default().as_str(), "full-snapshot");
    }

    #[test]
    fn test_custom_patch_type() {
        let pt = PatchType::from("json-patch");
        assert_eq!(pt, PatchType::Custom("json-patch".into()));
        assert_eq!(pt.to_string(), "json-patch");
    }
}
