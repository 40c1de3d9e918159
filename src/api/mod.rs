pub mod dashboard;
pub mod routes;

pub use routes::build_router;
