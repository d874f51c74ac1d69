//! `stockroom-auth` — identity, credential, and role boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: token
//! extraction belongs to the transport layer and user persistence to the
//! store adapters. What lives here is the pure material both sides share.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{authorize, AuthzError, ADMIN_ONLY, ANY_ROLE, STOCK_STAFF};
pub use claims::{validate_claims, AuthClaims, TokenValidationError, TOKEN_TTL_SECS};
pub use password::{hash_password, verify_password};
pub use roles::Role;
pub use token::{AuthError, TokenCodec};
pub use user::{validate_registration, validate_user_update, NewUser, User, UserUpdate};
