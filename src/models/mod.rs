pub mod helm;

pub use helm::*;
