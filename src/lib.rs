#[macro_use]
extern crate rocket;

use rocket::figment::Figment;
use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

use config::ConfigFairing;
use logging::LoggerFairing;
use model::store::StoreFairing;

/// Assemble the server from the default figment (`Rocket.toml` plus
/// `ROCKET_*` environment variables).
pub fn build() -> Rocket<Build> {
    custom(rocket::Config::figment())
}

/// Assemble the server from an explicit figment.
/// The fairings run in attachment order: the config must be in managed
/// state before the store can be constructed from it.
pub fn custom(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(StoreFairing)
        .attach(LoggerFairing)
}

#[cfg(test)]
pub(crate) mod testing {
    use rocket::http::Header;
    use rocket::local::asynchronous::Client;

    use crate::model::address::CALLER_HEADER;

    /// First accounts of the standard local-devnet mnemonic.
    pub const OWNER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    pub const VOTER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
    pub const OTHER_VOTER: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";

    /// A local client against a fresh store owned by [`OWNER`].
    pub async fn client() -> Client {
        log4rs_test_utils::test_logging::init_logging_once_for(["ballot_backend"], None, None);
        let figment = rocket::Config::figment().merge(("owner", OWNER));
        Client::tracked(crate::custom(figment))
            .await
            .expect("valid test rocket")
    }

    /// Header asserting the given caller identity.
    pub fn as_caller(address: &str) -> Header<'static> {
        Header::new(CALLER_HEADER, address.to_string())
    }
}
