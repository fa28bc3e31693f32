pub mod centrality;
pub mod chokepoints;
pub mod impact;
pub mod paths;
pub mod surface;

pub use centrality::{compute_centrality, Algorithm, CentralityReport};
pub use chokepoints::{find_chokepoints, ChokepointReport};
pub use impact::{score_impact, ImpactReport};
pub use paths::{find_paths, PathReport};
pub use surface::{analyze_surface, EntryPointReport};
