pub mod cmd;
pub mod mrc;
