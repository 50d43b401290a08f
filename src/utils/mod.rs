pub mod timer;
pub mod validation;
