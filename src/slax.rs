//! Main module for slax library functionality

pub mod building;
pub mod config;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;
pub mod trace;
