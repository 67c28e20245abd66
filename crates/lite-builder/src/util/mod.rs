pub mod cmd;
pub mod repo;
