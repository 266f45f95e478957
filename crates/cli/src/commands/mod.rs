pub mod replay;
pub mod stress;
