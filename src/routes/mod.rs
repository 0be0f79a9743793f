/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules.
/// Access control is applied explicitly at the module level (via Axum layers),
/// so no protected endpoint can be exposed by accident.
///
/// The three modules map directly to the access tiers.

/// Routes accessible without a session: health, registration, login, logout.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated session token.
pub mod authenticated;

/// Routes restricted to the elevated (superadmin) tier.
/// Handlers enforce the role check after the authentication layer.
pub mod admin;
