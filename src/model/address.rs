use std::fmt::{Display, Formatter};

use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Header carrying the caller's address on write calls.
pub const CALLER_HEADER: &str = "X-Caller-Address";

/// An opaque caller identity, the analogue of a ledger transaction sender.
/// Addresses compare case-insensitively, so they are normalised to lowercase
/// on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Address(raw.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Address::new)
    }
}

/// Allow the caller identity to be taken as a request guard. A request
/// without an identity cannot be attributed, so it is rejected outright
/// rather than reaching the store.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for Address {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one(CALLER_HEADER) {
            Some(raw) if !raw.trim().is_empty() => Outcome::Success(Address::new(raw)),
            _ => Outcome::Error((Status::BadRequest, ())),
        }
    }
}
