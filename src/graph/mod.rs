pub mod builder;
pub mod model;
pub mod node;

pub use builder::build;
pub use model::{AttackGraph, GraphSummary};
pub use node::{EdgeInfo, Node, NodeKind};
