/// Authorization helpers and permission checks
///
/// This module provides the role-based access rules the route layer enforces:
///
/// 1. **Admin-only endpoints**: user creation and deletion
/// 2. **Self-or-admin**: a user may read/update their own record; admins may
///    touch anyone's
/// 3. **Self-delete ban**: nobody deletes their own account, admins included
///
/// Every check is pure (role data travels in the session token), so the
/// helpers take a [`CurrentUser`] and return a typed [`AuthzError`] the API
/// layer folds into a 403/400 response.
///
/// # Example
///
/// ```
/// use boardflow_shared::auth::authorization::{require_admin, require_self_or_admin};
/// use boardflow_shared::auth::middleware::CurrentUser;
/// use boardflow_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example(user: CurrentUser, target: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// require_self_or_admin(&user, target)?;
/// # Ok(())
/// # }
/// ```
use uuid::Uuid;

use super::middleware::CurrentUser;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Endpoint requires the admin role
    #[error("Admin access required")]
    AdminRequired,

    /// Caller may only touch their own record
    #[error("You can only update your own profile")]
    NotSelfOrAdmin,

    /// Deleting one's own account is never allowed
    #[error("You cannot delete your own account")]
    SelfDeletion,
}

/// Requires the caller to hold the admin role
///
/// # Errors
///
/// Returns `AuthzError::AdminRequired` otherwise.
pub fn require_admin(user: &CurrentUser) -> Result<(), AuthzError> {
    if !user.is_admin() {
        return Err(AuthzError::AdminRequired);
    }

    Ok(())
}

/// Requires the caller to be the target user or an admin
///
/// # Errors
///
/// Returns `AuthzError::NotSelfOrAdmin` otherwise.
pub fn require_self_or_admin(user: &CurrentUser, target_id: Uuid) -> Result<(), AuthzError> {
    if user.id != target_id && !user.is_admin() {
        return Err(AuthzError::NotSelfOrAdmin);
    }

    Ok(())
}

/// Rejects deletion of the caller's own account
///
/// Applies to admins too; the API maps this to 400, not 403.
///
/// # Errors
///
/// Returns `AuthzError::SelfDeletion` when `target_id` is the caller.
pub fn deny_self_delete(user: &CurrentUser, target_id: Uuid) -> Result<(), AuthzError> {
    if user.id == target_id {
        return Err(AuthzError::SelfDeletion);
    }

    Ok(())
}
