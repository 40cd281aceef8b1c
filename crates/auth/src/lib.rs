//! `hrdesk-auth` — roles, permissions, session credentials and
//! authorization decisions.
//!
//! This crate is intentionally decoupled from HTTP and storage; the identity
//! store is reached through the [`UserDirectory`] port.

pub mod authorize;
pub mod catalog;
pub mod claims;
pub mod codec;
pub mod directory;
pub mod identity;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod session;

pub use authorize::{authorize, authorize_all, AuthzError, Denial, Requirement};
pub use claims::{Credential, TokenClaims, TokenUse};
pub use codec::{CredentialCodec, CredentialError};
pub use directory::{DirectoryError, UserAccount, UserDirectory};
pub use identity::IdentityContext;
pub use password::{PasswordError, PasswordHasher};
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
pub use session::{SessionError, SessionService, TokenPair, TokenPolicy};
