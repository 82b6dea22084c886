pub mod interface;
pub mod lease;
pub mod wifi;
