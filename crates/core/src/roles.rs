//! Role names shared between auth middleware and route handlers.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPPLIER: &str = "supplier";
pub const ROLE_CLIENT: &str = "client";
