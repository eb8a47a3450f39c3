/// Middleware modules for the API server
///
/// - Security headers
///
/// The request authenticator itself lives in `taskvault_shared::auth::middleware`
/// and is wired in by [`crate::app::build_router`].

pub mod security;
