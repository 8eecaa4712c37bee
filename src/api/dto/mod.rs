//! Response bodies rendered by the controllers.

pub mod health;
pub mod reputation;
pub mod route_info;
