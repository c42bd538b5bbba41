//! Access policy for chanboard.
//!
//! Every protected operation is looked up in a static capability table keyed
//! by (operation, caller role). There is no other source of authorization.

use thiserror::Error;

use crate::db::{Account, CallerRole};

/// Permission-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The caller presented no valid credentials.
    #[error("authentication required")]
    NotAuthenticated,

    /// The caller is signed in but the role does not allow the operation.
    #[error("you do not have permission to {0}")]
    Forbidden(&'static str),

    /// The account has been deactivated.
    #[error("account is inactive")]
    AccountInactive,
}

impl From<PermissionError> for crate::ChanError {
    fn from(e: PermissionError) -> Self {
        match e {
            PermissionError::NotAuthenticated => crate::ChanError::Auth(e.to_string()),
            _ => crate::ChanError::Permission(e.to_string()),
        }
    }
}

/// Operations guarded by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Signup,
    ListBoards,
    RetrieveBoard,
    CreateBoard,
    UpdateBoard,
    DeleteBoard,
    ViewOwnProfile,
    UpdateOwnProfile,
    ChangeOwnPassword,
    ListThreads,
    ViewThread,
    CreateThread,
    /// Attach an image to a thread. Ownership is checked separately.
    AttachThreadImage,
    Vote,
}

impl Operation {
    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::Signup => "sign up",
            Operation::ListBoards => "list boards",
            Operation::RetrieveBoard => "retrieve boards",
            Operation::CreateBoard => "create boards",
            Operation::UpdateBoard => "update boards",
            Operation::DeleteBoard => "delete boards",
            Operation::ViewOwnProfile => "view a profile",
            Operation::UpdateOwnProfile => "update a profile",
            Operation::ChangeOwnPassword => "change a password",
            Operation::ListThreads => "list threads",
            Operation::ViewThread => "view threads",
            Operation::CreateThread => "create threads",
            Operation::AttachThreadImage => "attach thread images",
            Operation::Vote => "vote",
        }
    }
}

/// Roles allowed per operation, as `(anonymous, authenticated, admin)`.
const CAPABILITIES: &[(Operation, [bool; 3])] = &[
    (Operation::Signup, [true, true, true]),
    (Operation::ListBoards, [true, true, true]),
    (Operation::RetrieveBoard, [false, false, true]),
    (Operation::CreateBoard, [false, false, true]),
    (Operation::UpdateBoard, [false, false, true]),
    (Operation::DeleteBoard, [false, false, true]),
    (Operation::ViewOwnProfile, [false, true, true]),
    (Operation::UpdateOwnProfile, [false, true, true]),
    (Operation::ChangeOwnPassword, [false, true, true]),
    (Operation::ListThreads, [true, true, true]),
    (Operation::ViewThread, [true, true, true]),
    (Operation::CreateThread, [false, true, true]),
    (Operation::AttachThreadImage, [false, true, true]),
    (Operation::Vote, [false, true, true]),
];

/// Look up whether `role` may perform `op`.
///
/// Operations missing from the table are denied.
///
/// # Examples
///
/// ```
/// use chanboard::auth::permission::{is_allowed, Operation};
/// use chanboard::db::CallerRole;
///
/// assert!(is_allowed(Operation::ListBoards, CallerRole::Anonymous));
/// assert!(!is_allowed(Operation::CreateBoard, CallerRole::Authenticated));
/// assert!(is_allowed(Operation::CreateBoard, CallerRole::Admin));
/// ```
pub fn is_allowed(op: Operation, role: CallerRole) -> bool {
    let column = match role {
        CallerRole::Anonymous => 0,
        CallerRole::Authenticated => 1,
        CallerRole::Admin => 2,
    };
    CAPABILITIES
        .iter()
        .find(|(o, _)| *o == op)
        .map(|(_, allowed)| allowed[column])
        .unwrap_or(false)
}

/// Check whether the caller may perform `op`.
///
/// Anonymous denials report `NotAuthenticated`, authenticated ones
/// `Forbidden`. An inactive account is refused for anything that is not
/// open to anonymous callers.
pub fn check_permission(account: Option<&Account>, op: Operation) -> Result<(), PermissionError> {
    if let Some(account) = account {
        if !account.is_active && !is_allowed(op, CallerRole::Anonymous) {
            return Err(PermissionError::AccountInactive);
        }
    }

    let role = CallerRole::of(account);
    if is_allowed(op, role) {
        return Ok(());
    }

    match role {
        CallerRole::Anonymous => Err(PermissionError::NotAuthenticated),
        _ => Err(PermissionError::Forbidden(op.describe())),
    }
}

/// Check whether the caller may act on a resource owned by `owner_id`.
///
/// Admins may act on anything; others only on their own resources.
pub fn can_modify_resource(account: &Account, owner_id: i64) -> bool {
    account.is_active && (account.is_staff || account.id == owner_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DEFAULT_AVATAR;

    fn account(id: i64, is_admin: bool) -> Account {
        Account {
            id,
            email: format!("user{id}@example.com"),
            username: format!("user{id}"),
            password: "hash".to_string(),
            date_of_birth: None,
            avatar: DEFAULT_AVATAR.to_string(),
            is_active: true,
            is_staff: is_admin,
            is_admin,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    const ALL_OPERATIONS: &[Operation] = &[
        Operation::Signup,
        Operation::ListBoards,
        Operation::RetrieveBoard,
        Operation::CreateBoard,
        Operation::UpdateBoard,
        Operation::DeleteBoard,
        Operation::ViewOwnProfile,
        Operation::UpdateOwnProfile,
        Operation::ChangeOwnPassword,
        Operation::ListThreads,
        Operation::ViewThread,
        Operation::CreateThread,
        Operation::AttachThreadImage,
        Operation::Vote,
    ];

    #[test]
    fn test_every_operation_is_in_table() {
        for op in ALL_OPERATIONS {
            assert!(
                CAPABILITIES.iter().any(|(o, _)| o == op),
                "{op:?} missing from capability table"
            );
        }
    }

    #[test]
    fn test_admin_allowed_everything() {
        for op in ALL_OPERATIONS {
            assert!(is_allowed(*op, CallerRole::Admin), "{op:?}");
        }
    }

    #[test]
    fn test_board_management_admin_only() {
        for op in [
            Operation::RetrieveBoard,
            Operation::CreateBoard,
            Operation::UpdateBoard,
            Operation::DeleteBoard,
        ] {
            assert!(!is_allowed(op, CallerRole::Anonymous));
            assert!(!is_allowed(op, CallerRole::Authenticated));
        }
    }

    #[test]
    fn test_public_operations() {
        for op in [
            Operation::Signup,
            Operation::ListBoards,
            Operation::ListThreads,
            Operation::ViewThread,
        ] {
            assert!(is_allowed(op, CallerRole::Anonymous));
        }
    }

    #[test]
    fn test_profile_requires_authentication() {
        assert!(!is_allowed(Operation::ViewOwnProfile, CallerRole::Anonymous));
        assert!(is_allowed(Operation::ViewOwnProfile, CallerRole::Authenticated));
        assert!(!is_allowed(Operation::ChangeOwnPassword, CallerRole::Anonymous));
    }

    #[test]
    fn test_check_permission_anonymous_denied() {
        assert_eq!(
            check_permission(None, Operation::CreateThread),
            Err(PermissionError::NotAuthenticated)
        );
        assert!(check_permission(None, Operation::ListBoards).is_ok());
    }

    #[test]
    fn test_check_permission_authenticated_forbidden() {
        let user = account(1, false);
        assert_eq!(
            check_permission(Some(&user), Operation::CreateBoard),
            Err(PermissionError::Forbidden("create boards"))
        );
        assert!(check_permission(Some(&user), Operation::Vote).is_ok());
    }

    #[test]
    fn test_check_permission_admin() {
        let admin = account(1, true);
        assert!(check_permission(Some(&admin), Operation::DeleteBoard).is_ok());
    }

    #[test]
    fn test_inactive_account() {
        let mut user = account(1, true);
        user.is_active = false;

        assert_eq!(
            check_permission(Some(&user), Operation::CreateBoard),
            Err(PermissionError::AccountInactive)
        );
        assert!(check_permission(Some(&user), Operation::ListBoards).is_ok());
    }

    #[test]
    fn test_can_modify_resource() {
        let owner = account(1, false);
        let other = account(2, false);
        let admin = account(3, true);

        assert!(can_modify_resource(&owner, 1));
        assert!(!can_modify_resource(&other, 1));
        assert!(can_modify_resource(&admin, 1));
    }
}
