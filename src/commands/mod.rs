pub mod general;
pub mod whitelist;

pub use general::{help, ping};
pub use whitelist::{setup, whitelist};
