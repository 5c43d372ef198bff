pub mod samplers;
pub mod stores;
