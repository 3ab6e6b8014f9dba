//! Session cache adapters.

mod in_memory;
mod redis;

pub use in_memory::InMemorySessionCache;
pub use redis::RedisSessionCache;
