//! oauth2-login - Google OAuth2 and password authentication core
//!
//! This crate sequences three login flows over a shared user database and
//! session-token issuer: password login against local accounts, the Google
//! authorization-code flow with session-bound anti-forgery state, and direct
//! ID-token login. Stores and the provider transport are injected, so
//! embedders choose memory, redis, sqlite, or postgres backends and tests
//! run against stubs.

mod config;
mod coordination;
mod csrf;
mod oauth2;
mod session;
mod storage;
mod userdb;
mod utils;

pub use config::{AuthConfig, ConfigError};

// The front door and its result/error types
pub use coordination::{AuthError, AuthOrchestrator, AuthSuccess, UserSummary};

pub use csrf::CsrfStateStore;

pub use oauth2::{
    ExternalIdentity, HttpIdentityProvider, IdentityProvider, OAuth2Error, ProviderClient,
    ProviderTokens,
};

pub use session::{SessionClaims, SessionError, SessionToken, TokenIssuer};

pub use storage::{
    CacheData, CacheStore, InMemoryCacheStore, RedisCacheStore, StorageError,
};

pub use userdb::{
    AuthProvider, IdentityResolver, InMemoryUserRepository, PostgresUserRepository,
    SqliteUserRepository, User, UserError, UserRepository, hash_password, verify_password,
};
