//! Read-only accessors. These never mutate and never require a caller
//! identity: they are snapshots of the latest committed state.

use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    address::Address,
    election::{ElectionDescription, ElectionId, ElectionList},
    store::BallotStore,
};

pub fn routes() -> Vec<Route> {
    routes![owner, elections, election, candidates, results]
}

#[get("/owner")]
pub(crate) async fn owner(store: &State<BallotStore>) -> Json<Address> {
    Json(store.owner().clone())
}

#[get("/elections")]
pub(crate) async fn elections(store: &State<BallotStore>) -> Json<ElectionList> {
    Json(store.all_elections())
}

#[get("/elections/<election_id>")]
pub(crate) async fn election(
    election_id: ElectionId,
    store: &State<BallotStore>,
) -> Result<Json<ElectionDescription>> {
    Ok(Json(store.election(election_id)?))
}

#[get("/elections/<election_id>/candidates")]
pub(crate) async fn candidates(
    election_id: ElectionId,
    store: &State<BallotStore>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(store.candidates(election_id)?))
}

#[get("/elections/<election_id>/results")]
pub(crate) async fn results(
    election_id: ElectionId,
    store: &State<BallotStore>,
) -> Result<Json<Vec<u64>>> {
    Ok(Json(store.results(election_id)?))
}
