pub mod entity;
pub mod enso;
pub mod frost;
pub mod practice;
