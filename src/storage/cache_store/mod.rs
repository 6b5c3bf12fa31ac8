mod memory;
mod redis;
mod types;

pub use memory::InMemoryCacheStore;
pub use redis::RedisCacheStore;
pub use types::CacheStore;
