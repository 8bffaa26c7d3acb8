pub mod address;
pub mod election;
pub mod store;
