//! Owner-restricted election management. The caller's identity comes from
//! the [`Address`] request guard; the store itself enforces that it matches
//! the configured owner.

use rocket::{serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    address::Address,
    election::{ElectionDescription, ElectionId},
    store::BallotStore,
};

pub fn routes() -> Vec<Route> {
    routes![
        create_election,
        deactivate_election,
        add_candidate,
        remove_candidate,
    ]
}

/// Request body for creating an election.
#[derive(Debug, Serialize, Deserialize)]
pub struct ElectionSpec {
    pub name: String,
    pub candidates: Vec<String>,
}

/// Request body for adding a candidate.
#[derive(Debug, Serialize, Deserialize)]
pub struct CandidateSpec {
    pub name: String,
}

#[post("/elections", data = "<spec>", format = "json")]
pub(crate) async fn create_election(
    caller: Address,
    spec: Json<ElectionSpec>,
    store: &State<BallotStore>,
) -> Result<Json<ElectionDescription>> {
    let spec = spec.into_inner();
    let election = store.create_election(&caller, spec.name, spec.candidates)?;
    Ok(Json(election))
}

#[post("/elections/<election_id>/deactivate")]
pub(crate) async fn deactivate_election(
    caller: Address,
    election_id: ElectionId,
    store: &State<BallotStore>,
) -> Result<Json<ElectionDescription>> {
    let election = store.deactivate_election(&caller, election_id)?;
    Ok(Json(election))
}

#[post("/elections/<election_id>/candidates", data = "<spec>", format = "json")]
pub(crate) async fn add_candidate(
    caller: Address,
    election_id: ElectionId,
    spec: Json<CandidateSpec>,
    store: &State<BallotStore>,
) -> Result<Json<ElectionDescription>> {
    let election = store.add_candidate(&caller, election_id, spec.into_inner().name)?;
    Ok(Json(election))
}

#[delete("/elections/<election_id>/candidates/<index>")]
pub(crate) async fn remove_candidate(
    caller: Address,
    election_id: ElectionId,
    index: usize,
    store: &State<BallotStore>,
) -> Result<Json<ElectionDescription>> {
    let election = store.remove_candidate(&caller, election_id, index)?;
    Ok(Json(election))
}

#[cfg(test)]
pub(crate) mod tests {
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::{Client, LocalResponse};

    use crate::error::Rejection;
    use crate::model::election::{ElectionDescription, ElectionId, ElectionList};
    use crate::testing::{as_caller, client, OWNER, VOTER};

    use super::*;

    #[rocket::async_test]
    async fn owner_creates_an_election() {
        let client = client().await;
        let spec = election_spec("Election 1", &["Alice", "Bob"]);

        let election = create_election_as(&client, OWNER, &spec).await;
        assert_eq!(election.id, 0);
        assert_eq!(election.name, "Election 1");
        assert!(election.is_active);
        assert_eq!(election.candidates, vec!["Alice", "Bob"]);
        assert_eq!(election.vote_counts, vec![0, 0]);

        // Retrievable afterwards with the same contents.
        let fetched = get_election(&client, 0).await;
        assert_eq!(fetched, election);
    }

    #[rocket::async_test]
    async fn ids_are_assigned_in_creation_order() {
        let client = client().await;
        for n in 0..3u32 {
            let spec = election_spec(&format!("Election {n}"), &["Alice", "Bob"]);
            let election = create_election_as(&client, OWNER, &spec).await;
            assert_eq!(election.id, n);
        }
    }

    #[rocket::async_test]
    async fn non_owner_cannot_create_an_election() {
        let client = client().await;
        let spec = election_spec("Election 2", &["Alice", "Bob"]);

        let response = post_election(&client, VOTER, &spec).await;
        assert_eq!(response.status(), Status::Unauthorized);
        let rejection: Rejection =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(rejection.reason, "Only the owner can perform this action");

        // Nothing was created.
        let list = all_elections(&client).await;
        assert!(list.names.is_empty());
    }

    #[rocket::async_test]
    async fn anonymous_writes_are_rejected() {
        let client = client().await;
        let spec = election_spec("Election 3", &["Alice"]);
        let response = client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .body(serde_json::to_string(&spec).unwrap())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
    }

    #[rocket::async_test]
    async fn owner_deactivates_an_election() {
        let client = client().await;
        create_election_as(&client, OWNER, &election_spec("Election 3", &["Alice", "Bob"])).await;

        let election = deactivate(&client, OWNER, 0, Status::Ok).await.unwrap();
        assert!(!election.is_active);
        assert!(!get_election(&client, 0).await.is_active);
    }

    #[rocket::async_test]
    async fn non_owner_cannot_deactivate() {
        let client = client().await;
        create_election_as(&client, OWNER, &election_spec("Election 4", &["Alice", "Bob"])).await;

        deactivate(&client, VOTER, 0, Status::Unauthorized).await;
        assert!(get_election(&client, 0).await.is_active);
    }

    #[rocket::async_test]
    async fn deactivating_a_missing_election_is_not_found() {
        let client = client().await;
        deactivate(&client, OWNER, 42, Status::NotFound).await;
    }

    #[rocket::async_test]
    async fn owner_adds_a_candidate() {
        let client = client().await;
        create_election_as(&client, OWNER, &election_spec("Election 8", &["Alice", "Bob"])).await;

        let response = client
            .post(uri!(add_candidate(0)))
            .header(ContentType::JSON)
            .header(as_caller(OWNER))
            .body(r#"{"name":"Charlie"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let election: ElectionDescription =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(election.candidates, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(election.vote_counts, vec![0, 0, 0]);
    }

    #[rocket::async_test]
    async fn non_owner_cannot_add_a_candidate() {
        let client = client().await;
        create_election_as(&client, OWNER, &election_spec("Election 9", &["Alice", "Bob"])).await;

        let response = client
            .post(uri!(add_candidate(0)))
            .header(ContentType::JSON)
            .header(as_caller(VOTER))
            .body(r#"{"name":"Charlie"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(
            get_election(&client, 0).await.candidates,
            vec!["Alice", "Bob"]
        );
    }

    #[rocket::async_test]
    async fn owner_removes_a_candidate() {
        let client = client().await;
        let spec = election_spec("Election 10", &["Alice", "Bob", "Charlie"]);
        create_election_as(&client, OWNER, &spec).await;

        let election = remove(&client, OWNER, 0, 1, Status::Ok).await.unwrap();
        assert!(!election.candidates.contains(&"Bob".to_string()));
        assert_eq!(election.candidates.len(), election.vote_counts.len());
    }

    #[rocket::async_test]
    async fn non_owner_cannot_remove_a_candidate() {
        let client = client().await;
        let spec = election_spec("Election 11", &["Alice", "Bob", "Charlie"]);
        create_election_as(&client, OWNER, &spec).await;

        remove(&client, VOTER, 0, 1, Status::Unauthorized).await;
        assert_eq!(
            get_election(&client, 0).await.candidates,
            vec!["Alice", "Bob", "Charlie"]
        );
    }

    #[rocket::async_test]
    async fn removing_a_bad_index_is_rejected() {
        let client = client().await;
        create_election_as(&client, OWNER, &election_spec("Election 12", &["Alice"])).await;

        remove(&client, OWNER, 0, 5, Status::UnprocessableEntity).await;
        assert_eq!(get_election(&client, 0).await.candidates, vec!["Alice"]);
    }

    // Shared helpers, also used by the other api test modules.

    pub(crate) fn election_spec(name: &str, candidates: &[&str]) -> ElectionSpec {
        ElectionSpec {
            name: name.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub(crate) async fn post_election<'c>(
        client: &'c Client,
        caller: &str,
        spec: &ElectionSpec,
    ) -> LocalResponse<'c> {
        client
            .post(uri!(create_election))
            .header(ContentType::JSON)
            .header(as_caller(caller))
            .body(serde_json::to_string(spec).unwrap())
            .dispatch()
            .await
    }

    pub(crate) async fn create_election_as(
        client: &Client,
        caller: &str,
        spec: &ElectionSpec,
    ) -> ElectionDescription {
        let response = post_election(client, caller, spec).await;
        assert_eq!(response.status(), Status::Ok);
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }

    pub(crate) async fn get_election(client: &Client, id: ElectionId) -> ElectionDescription {
        let response = client
            .get(uri!(crate::api::public::election(id)))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }

    pub(crate) async fn all_elections(client: &Client) -> ElectionList {
        let response = client
            .get(uri!(crate::api::public::elections))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
    }

    async fn deactivate(
        client: &Client,
        caller: &str,
        id: ElectionId,
        status: Status,
    ) -> Option<ElectionDescription> {
        let response = client
            .post(uri!(deactivate_election(id)))
            .header(as_caller(caller))
            .dispatch()
            .await;
        assert_eq!(response.status(), status);
        if status == Status::Ok {
            Some(serde_json::from_str(&response.into_string().await.unwrap()).unwrap())
        } else {
            None
        }
    }

    async fn remove(
        client: &Client,
        caller: &str,
        id: ElectionId,
        index: usize,
        status: Status,
    ) -> Option<ElectionDescription> {
        let response = client
            .delete(uri!(remove_candidate(id, index)))
            .header(as_caller(caller))
            .dispatch()
            .await;
        assert_eq!(response.status(), status);
        if status == Status::Ok {
            Some(serde_json::from_str(&response.into_string().await.unwrap()).unwrap())
        } else {
            None
        }
    }
}
