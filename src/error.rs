use rocket::{http::Status, response::status::Custom, response::Responder, serde::json::Json};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::election::ElectionId;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can make a store operation fail. The display strings for
/// `Unauthorized`, `AlreadyVoted`, and `InactiveElection` are part of the
/// wire contract: the frontend shows them verbatim.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Only the owner can perform this action")]
    Unauthorized,
    #[error("Election {0} does not exist")]
    ElectionNotFound(ElectionId),
    #[error("Candidate index {index} is out of range for election {election}")]
    CandidateOutOfRange { election: ElectionId, index: usize },
    #[error("Election is not active")]
    InactiveElection,
    #[error("You have already voted")]
    AlreadyVoted,
}

/// Wire form of a rejected call.
#[derive(Debug, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = match self {
            Self::Unauthorized => Status::Unauthorized,
            Self::ElectionNotFound(_) => Status::NotFound,
            Self::CandidateOutOfRange { .. } => Status::UnprocessableEntity,
            Self::InactiveElection | Self::AlreadyVoted => Status::BadRequest,
        };
        let body = Json(Rejection {
            reason: self.to_string(),
        });
        Custom(status, body).respond_to(req)
    }
}
