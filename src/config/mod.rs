pub mod cvss;
pub mod loader;
pub mod schema;
pub mod types;

pub use loader::load_topology;
pub use types::*;
