pub mod error;
pub mod fetch;
pub mod fmi_client;
pub mod query;
