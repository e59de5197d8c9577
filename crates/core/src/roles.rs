//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in the migrations.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_OPERATOR: &str = "operator";
pub const ROLE_VIEWER: &str = "viewer";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_MANAGER,
    ROLE_TECHNICIAN,
    ROLE_OPERATOR,
    ROLE_VIEWER,
];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let err = validate_role("superuser").unwrap_err();
        assert!(err.contains("Invalid role"));
    }
}
