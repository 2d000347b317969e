pub mod locations;

pub use locations::{LocationRegistry, SavedLocation};
