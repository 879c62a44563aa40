//! Error taxonomy for composition discovery
//!
//! Only `CatalogUnavailable` is meant to reach a caller as a failure. The
//! other variants describe expected outcomes that the service layer turns
//! into explanatory text.

/// Errors produced by the discovery engine and its collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    /// The resource catalog could not be read (unreachable, timed out, forbidden)
    #[error("Resource catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// No resource matched the query
    #[error("No {kind} resource matching '{instance}' found in namespace '{namespace}'")]
    NotFound {
        kind: String,
        instance: String,
        namespace: String,
    },

    /// The raw schema document does not have the expected shape
    #[error("Schema document is malformed: {0}")]
    SchemaMalformed(String),

    /// The schema document has no definition for the requested kind
    #[error("No schema definition found for '{0}'")]
    DefinitionNotFound(String),
}

impl DiscoveryError {
    /// Whether the error is an expected "nothing to show" outcome rather than a failure
    pub fn is_benign(&self) -> bool {
        !matches!(self, DiscoveryError::CatalogUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_catalog_errors_are_failures() {
        assert!(!DiscoveryError::CatalogUnavailable("down".to_string()).is_benign());
        assert!(DiscoveryError::DefinitionNotFound("typedir.X".to_string()).is_benign());
        assert!(DiscoveryError::SchemaMalformed("not a mapping".to_string()).is_benign());
        assert!(
            DiscoveryError::NotFound {
                kind: "Postgres".to_string(),
                instance: "pg1".to_string(),
                namespace: "default".to_string(),
            }
            .is_benign()
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = DiscoveryError::NotFound {
            kind: "Postgres".to_string(),
            instance: "pg1".to_string(),
            namespace: "default".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No Postgres resource matching 'pg1' found in namespace 'default'"
        );
    }
}
