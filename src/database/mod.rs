pub mod location_repo;
pub mod schema;
