pub mod connection;
pub mod issue;
pub mod records;
pub mod revocation;
pub mod wallet;
