pub mod whitelist_manager;

pub use whitelist_manager::{create_shared_whitelist_manager, Requester, SharedWhitelistManager};
