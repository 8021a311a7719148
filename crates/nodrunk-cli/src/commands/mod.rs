pub mod check;
pub mod common;
pub mod config;
pub mod contact;
pub mod game;
pub mod range;
pub mod send;
pub mod status;
