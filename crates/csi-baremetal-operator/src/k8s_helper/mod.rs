pub mod container;
pub mod env;
pub mod metadata;
pub mod volume;
