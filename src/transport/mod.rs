//! Transport layer: the terminal front ends of the client

pub mod cli;
