use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::address::Address;

/// Sequential election identifier, assigned in creation order starting at 0.
pub type ElectionId = u32;

/// Core election state: a named poll with an ordered candidate list, an
/// index-aligned tally, and a one-way active flag. Elections are never
/// deleted; a deactivated election stays readable forever.
#[derive(Debug, Clone)]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    pub is_active: bool,
    pub candidates: Vec<String>,
    pub vote_counts: Vec<u64>,
    pub has_voted: HashSet<Address>,
    pub created_at: DateTime<Utc>,
}

impl Election {
    /// Create a new active election with a zeroed tally.
    /// Duplicate names are allowed; the id is the identity.
    pub fn new(id: ElectionId, name: String, candidates: Vec<String>) -> Self {
        let vote_counts = vec![0; candidates.len()];
        Self {
            id,
            name,
            is_active: true,
            candidates,
            vote_counts,
            has_voted: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a candidate with a zero count, keeping the tally aligned.
    pub fn add_candidate(&mut self, name: String) {
        self.candidates.push(name);
        self.vote_counts.push(0);
    }

    /// Remove the candidate at `index` together with its count. Later
    /// candidates shift down one slot: indices are NOT stable across
    /// removals and callers must re-read the candidate list afterwards.
    pub fn remove_candidate(&mut self, index: usize) -> Result<String> {
        self.check_index(index)?;
        self.vote_counts.remove(index);
        Ok(self.candidates.remove(index))
    }

    /// Record a vote for the candidate at `index`. All checks run before
    /// any state changes, so a failed vote leaves the election untouched.
    pub fn record_vote(&mut self, voter: &Address, index: usize) -> Result<()> {
        if !self.is_active {
            return Err(Error::InactiveElection);
        }
        if self.has_voted.contains(voter) {
            return Err(Error::AlreadyVoted);
        }
        self.check_index(index)?;

        self.vote_counts[index] += 1;
        self.has_voted.insert(voter.clone());
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.candidates.len() {
            Ok(())
        } else {
            Err(Error::CandidateOutOfRange {
                election: self.id,
                index,
            })
        }
    }
}

/// A full snapshot of one election, as returned to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionDescription {
    pub id: ElectionId,
    pub name: String,
    pub is_active: bool,
    pub candidates: Vec<String>,
    pub vote_counts: Vec<u64>,
    pub created_at: DateTime<Utc>,
}

impl From<&Election> for ElectionDescription {
    fn from(election: &Election) -> Self {
        Self {
            id: election.id,
            name: election.name.clone(),
            is_active: election.is_active,
            candidates: election.candidates.clone(),
            vote_counts: election.vote_counts.clone(),
            created_at: election.created_at,
        }
    }
}

/// Bulk listing for the frontend: three sequences aligned by election id.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectionList {
    pub names: Vec<String>,
    pub active: Vec<bool>,
    pub candidates: Vec<Vec<String>>,
}
