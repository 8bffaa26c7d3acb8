use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::info;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};

use crate::config::Config;
use crate::error::{Error, Result};

use super::address::Address;
use super::election::{Election, ElectionDescription, ElectionId, ElectionList};

/// The ballot state machine: every election, tally, and voter roll, behind a
/// single lock. The ledger this models commits one transaction at a time, and
/// the write lock reproduces exactly that: each mutating operation validates
/// fully before touching state, so every call is all-or-nothing and totally
/// ordered with respect to the other mutations.
pub struct BallotStore {
    owner: Address,
    elections: RwLock<Vec<Election>>,
}

impl BallotStore {
    /// An empty store owned by the given identity. The owner is fixed for
    /// the lifetime of the store.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            elections: RwLock::new(Vec::new()),
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Create a new active election with a zeroed tally and return its
    /// snapshot (including the assigned sequential id). Owner only.
    pub fn create_election(
        &self,
        caller: &Address,
        name: String,
        candidates: Vec<String>,
    ) -> Result<ElectionDescription> {
        self.ensure_owner(caller)?;
        let mut elections = self.write();
        let id = elections.len() as ElectionId;
        let election = Election::new(id, name, candidates);
        let description = ElectionDescription::from(&election);
        elections.push(election);
        info!("Created election {id} ({})", description.name);
        Ok(description)
    }

    /// Deactivate an election. One-way: there is no reactivation path.
    /// Owner only.
    pub fn deactivate_election(
        &self,
        caller: &Address,
        id: ElectionId,
    ) -> Result<ElectionDescription> {
        self.ensure_owner(caller)?;
        let mut elections = self.write();
        let election = lookup_mut(&mut elections, id)?;
        election.is_active = false;
        info!("Deactivated election {id}");
        Ok(ElectionDescription::from(&*election))
    }

    /// Append a candidate with a zero count. Owner only.
    pub fn add_candidate(
        &self,
        caller: &Address,
        id: ElectionId,
        name: String,
    ) -> Result<ElectionDescription> {
        self.ensure_owner(caller)?;
        let mut elections = self.write();
        let election = lookup_mut(&mut elections, id)?;
        election.add_candidate(name);
        Ok(ElectionDescription::from(&*election))
    }

    /// Remove the candidate at `index` and its aligned count. Indices of
    /// later candidates shift down; see [`Election::remove_candidate`].
    /// Owner only.
    pub fn remove_candidate(
        &self,
        caller: &Address,
        id: ElectionId,
        index: usize,
    ) -> Result<ElectionDescription> {
        self.ensure_owner(caller)?;
        let mut elections = self.write();
        let election = lookup_mut(&mut elections, id)?;
        let removed = election.remove_candidate(index)?;
        info!("Removed candidate {removed} from election {id}");
        Ok(ElectionDescription::from(&*election))
    }

    /// Cast the caller's one ballot in the given election and return the
    /// fresh tally. Open to any caller.
    pub fn vote(&self, caller: &Address, id: ElectionId, index: usize) -> Result<Vec<u64>> {
        let mut elections = self.write();
        let election = lookup_mut(&mut elections, id)?;
        election.record_vote(caller, index)?;
        Ok(election.vote_counts.clone())
    }

    /// Snapshot of a single election.
    pub fn election(&self, id: ElectionId) -> Result<ElectionDescription> {
        let elections = self.read();
        lookup(&elections, id).map(ElectionDescription::from)
    }

    /// Current candidate list of an election.
    pub fn candidates(&self, id: ElectionId) -> Result<Vec<String>> {
        let elections = self.read();
        lookup(&elections, id).map(|election| election.candidates.clone())
    }

    /// Current tally of an election, index-aligned with its candidates.
    pub fn results(&self, id: ElectionId) -> Result<Vec<u64>> {
        let elections = self.read();
        lookup(&elections, id).map(|election| election.vote_counts.clone())
    }

    /// Whether the caller has already cast a ballot in the given election.
    pub fn has_voted(&self, caller: &Address, id: ElectionId) -> Result<bool> {
        let elections = self.read();
        lookup(&elections, id).map(|election| election.has_voted.contains(caller))
    }

    /// Bulk listing across all elections, aligned by election id.
    pub fn all_elections(&self) -> ElectionList {
        let elections = self.read();
        let mut list = ElectionList::default();
        for election in elections.iter() {
            list.names.push(election.name.clone());
            list.active.push(election.is_active);
            list.candidates.push(election.candidates.clone());
        }
        list
    }

    fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if caller == &self.owner {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    // A panicking writer can only poison the lock between validation and a
    // set of infallible writes, so the state behind a poisoned lock is still
    // consistent and the guard can be recovered.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Election>> {
        self.elections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Election>> {
        self.elections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn lookup(elections: &[Election], id: ElectionId) -> Result<&Election> {
    elections
        .get(id as usize)
        .ok_or(Error::ElectionNotFound(id))
}

fn lookup_mut(elections: &mut [Election], id: ElectionId) -> Result<&mut Election> {
    elections
        .get_mut(id as usize)
        .ok_or(Error::ElectionNotFound(id))
}

/// A fairing that builds the store from the managed config. Must be attached
/// after [`crate::config::ConfigFairing`].
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Ballot store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(config) = rocket.state::<Config>() else {
            log::error!("Config must be loaded before the ballot store");
            return Err(rocket);
        };
        let store = BallotStore::new(config.owner().clone());
        info!("Ballot store online, owned by {}", store.owner());
        Ok(rocket.manage(store))
    }
}
