mod keys;
mod outcome;
mod serialization;
mod traits;

pub use keys::{make_cache_key, partition_key, CacheKey};
pub use outcome::PutOutcome;
pub use serialization::{decode_stored, serialize_entry, CacheEntry};
pub use traits::CacheClient;
