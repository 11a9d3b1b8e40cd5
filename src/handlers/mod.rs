pub mod companies;
pub mod extract;
pub mod jobs;
pub mod system;

pub use extract::{PartialJson, ValidJson};
