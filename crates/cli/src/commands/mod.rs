pub mod demo;
pub mod seed;
