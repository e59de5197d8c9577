//! Request extractors for authentication ([`auth::AuthUser`]) and the role
//! gates built on it ([`rbac::RequireAdmin`], [`rbac::RequireManager`],
//! [`rbac::RequireAuth`]).

pub mod auth;
pub mod rbac;
