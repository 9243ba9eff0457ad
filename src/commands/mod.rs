pub mod convert;
pub mod header;
