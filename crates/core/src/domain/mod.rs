pub mod contract;
pub mod keyword;
pub mod score;
pub mod summary;
pub mod trend;
