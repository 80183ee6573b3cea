use trackline_core::User;

/// Authenticated user for a request.
///
/// Inserted by the auth middleware and present on all protected routes.
#[derive(Debug, Clone)]
pub struct Actor(pub User);
