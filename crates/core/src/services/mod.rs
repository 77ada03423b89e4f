pub mod audit;
pub mod digest;
