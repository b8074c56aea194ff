pub mod catalog;
pub mod color;
pub mod run;
pub mod validate;
