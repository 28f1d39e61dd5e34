pub mod geo;
pub mod into_utc_trait;
pub mod kriging_model;
pub mod records;
