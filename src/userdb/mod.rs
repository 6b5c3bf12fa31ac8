mod errors;
mod password;
mod resolver;
mod store;
mod types;

pub use errors::UserError;
pub use password::{hash_password, verify_password};
pub use resolver::IdentityResolver;
pub use store::{InMemoryUserRepository, PostgresUserRepository, SqliteUserRepository, UserRepository};
pub use types::{AuthProvider, User};
