/// Prefix for all JSON API routes.
pub const API_PREFIX: &str = "/api";

/// Route the local assets directory is served under.
pub const ASSETS_ROUTE: &str = "/assets";
