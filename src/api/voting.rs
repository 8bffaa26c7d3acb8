//! Vote casting. Open to any caller identity, exactly once per election.
//! A submitted vote either commits in full or fails with no state change;
//! a failed call can simply be resubmitted.

use rocket::{serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{address::Address, election::ElectionId, store::BallotStore};

pub fn routes() -> Vec<Route> {
    routes![cast_vote, voted]
}

/// A ballot the caller wishes to cast: the index of a candidate in the
/// election's current candidate list.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteSpec {
    pub candidate: usize,
}

/// Cast the caller's one ballot and return the fresh tally snapshot.
#[post("/elections/<election_id>/votes", data = "<vote>", format = "json")]
pub(crate) async fn cast_vote(
    caller: Address,
    election_id: ElectionId,
    vote: Json<VoteSpec>,
    store: &State<BallotStore>,
) -> Result<Json<Vec<u64>>> {
    let counts = store.vote(&caller, election_id, vote.candidate)?;
    Ok(Json(counts))
}

/// Whether the caller has already cast a ballot in this election.
#[get("/elections/<election_id>/voted")]
pub(crate) async fn voted(
    caller: Address,
    election_id: ElectionId,
    store: &State<BallotStore>,
) -> Result<Json<bool>> {
    Ok(Json(store.has_voted(&caller, election_id)?))
}
