pub mod airtable;
pub mod fields;
pub mod inmemory_repo;
