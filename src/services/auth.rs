//! Caller identity context
//!
//! Every operation takes an explicit [`Principal`] resolved by the boundary
//! layer from the verified session, instead of reading a process-wide
//! "current user". This keeps concurrent requests isolated and the services
//! testable.

use serde::{Deserialize, Serialize};

use crate::utils::errors::{PlanMeError, Result};

/// The authenticated caller of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque uid assigned by the external identity provider
    uid: String,
}

impl Principal {
    /// Build a principal from a verified identity-provider uid. An empty
    /// uid means the caller is not logged in.
    pub fn from_uid(uid: impl Into<String>) -> Result<Self> {
        let uid = uid.into();
        if uid.trim().is_empty() {
            return Err(PlanMeError::Authentication(
                "You must be logged in".to_string(),
            ));
        }
        Ok(Self { uid })
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_uid_rejected() {
        assert_matches!(
            Principal::from_uid(""),
            Err(PlanMeError::Authentication(_))
        );
        assert_matches!(
            Principal::from_uid("   "),
            Err(PlanMeError::Authentication(_))
        );
    }

    #[test]
    fn test_valid_uid_accepted() {
        let principal = Principal::from_uid("fb-uid-123").unwrap();
        assert_eq!(principal.uid(), "fb-uid-123");
    }
}
