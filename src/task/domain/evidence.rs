//! Completion evidence carried by a task submission.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Link to the delivered work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliverableLink(String);

impl DeliverableLink {
    /// Parses an optional link, treating blank input as absent.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Option<Self> {
        non_blank(value).map(Self)
    }

    /// Returns the link as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliverableLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an uploaded completion artifact (storage key or data URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofArtifact(String);

impl ProofArtifact {
    /// Parses an optional artifact reference, treating blank input as absent.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Option<Self> {
        non_blank(value).map(Self)
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Proof of completion: a deliverable link, an artifact, or both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvidence {
    link: Option<DeliverableLink>,
    proof: Option<ProofArtifact>,
}

impl CompletionEvidence {
    /// Creates evidence from the supplied parts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingCompletionEvidence`] when both parts
    /// are absent.
    pub fn new(
        link: Option<DeliverableLink>,
        proof: Option<ProofArtifact>,
    ) -> Result<Self, TaskDomainError> {
        if link.is_none() && proof.is_none() {
            return Err(TaskDomainError::MissingCompletionEvidence);
        }
        Ok(Self { link, proof })
    }

    /// Parses raw request fields, treating blank strings as absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingCompletionEvidence`] when neither
    /// field carries a value.
    pub fn from_raw(link: Option<&str>, proof: Option<&str>) -> Result<Self, TaskDomainError> {
        Self::new(DeliverableLink::parse(link), ProofArtifact::parse(proof))
    }

    /// Returns the deliverable link, if any.
    #[must_use]
    pub const fn link(&self) -> Option<&DeliverableLink> {
        self.link.as_ref()
    }

    /// Returns the proof artifact, if any.
    #[must_use]
    pub const fn proof(&self) -> Option<&ProofArtifact> {
        self.proof.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Option<DeliverableLink>, Option<ProofArtifact>) {
        (self.link, self.proof)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}
