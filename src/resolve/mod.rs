pub mod normalize;
pub mod resolver;
pub mod tables;
