//! HTTP surface: the front controller, its controllers and their bodies.

pub mod dto;
pub mod handlers;
