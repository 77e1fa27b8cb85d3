//! Application layer: command and query handlers orchestrating the ports.

pub mod handlers;
