pub mod controller;
pub mod model;
pub mod router;

pub use model::AccessClaims;
pub use router::init_profile_router;
