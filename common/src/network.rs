pub mod outcome;
pub mod status;
pub mod target;
