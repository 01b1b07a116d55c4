pub mod attributes;
pub mod contract;
pub mod preferences;
pub mod recommendation;
