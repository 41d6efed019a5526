pub mod client;
pub mod error;
pub mod offers;
pub mod proofs;
pub mod protocol;
pub mod schema;

pub use client::AdminClient;
pub use error::AdminError;
