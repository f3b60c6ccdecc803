pub mod errors;
pub mod routes;
pub mod shutdown;
pub mod startup;

pub use routes::{build_router, AppState};
pub use shutdown::ShutdownTrigger;
pub use startup::{run, MockServer};
