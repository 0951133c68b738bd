use crate::game::Phase;
use crate::protocol::{RawCombination, RunRequest};
use sha2::{Digest, Sha256};

/// Content fingerprint of a phase request and the tickets it carries. Two
/// runs with the same id were asked exactly the same question with the same
/// seed about the same buy list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentifier {
    pub hash: String,
}

impl RunIdentifier {
    pub fn from_request(phase: Phase, request: &RunRequest) -> Self {
        Self::from_run(phase, request, &[])
    }

    /// An empty `tickets` list hashes the same as [`Self::from_request`].
    pub fn from_run(phase: Phase, request: &RunRequest, tickets: &[RawCombination]) -> Self {
        let mut hasher = Sha256::new();

        hasher.update(phase.as_ref().as_bytes());

        let request_json = serde_json::to_string(request).unwrap_or_default();
        hasher.update(request_json.as_bytes());

        if !tickets.is_empty() {
            let tickets_json = serde_json::to_string(tickets).unwrap_or_default();
            hasher.update(tickets_json.as_bytes());
        }

        let result = hasher.finalize();
        Self {
            hash: hex::encode(result),
        }
    }

    pub fn short(&self) -> &str {
        &self.hash[..8.min(self.hash.len())]
    }
}
