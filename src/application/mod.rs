//! Application layer - Use cases orchestrating the domain over the ports

pub mod dto;
pub mod errors;
pub mod ports;
pub mod services;
