pub mod catalog;
pub mod decode;
