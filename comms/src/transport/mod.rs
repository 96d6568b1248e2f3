/// HTTP client for the room backend, requires the 'client' feature and brings in reqwest
#[cfg(feature = "client")]
pub mod client;
