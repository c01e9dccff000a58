use crate::config::Partition;

/// Storage keys derived for one logical cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Redis Set tracking every entry key of the partition.
    pub redis_set: String,
    /// Key under which the entry payload is stored.
    pub cache_key: String,
}

/// Returns the partition identifier `prefix:cacheId:scriptId:userId`.
///
/// The same value names the Redis Set used to track membership, so all keys
/// of one partition can be enumerated or cleared together.
///
/// # Examples
///
/// ```
/// use cacheproxy_core::cache::partition_key;
/// use cacheproxy_core::config::Partition;
///
/// assert_eq!(partition_key(&Partition::default()), "p:c:s:u");
/// ```
pub fn partition_key(partition: &Partition) -> String {
    format!(
        "{}:{}:{}:{}",
        partition.prefix, partition.cache_id, partition.script_id, partition.user_id
    )
}

/// Derives the storage keys for a logical key within a partition.
///
/// # Examples
///
/// ```
/// use cacheproxy_core::cache::make_cache_key;
/// use cacheproxy_core::config::Partition;
///
/// let keys = make_cache_key(&Partition::default(), "foo");
/// assert_eq!(keys.redis_set, "p:c:s:u");
/// assert_eq!(keys.cache_key, "p:c:s:u-foo");
/// ```
pub fn make_cache_key(partition: &Partition, key: &str) -> CacheKey {
    let redis_set = partition_key(partition);
    let cache_key = format!("{}-{}", redis_set, key);
    CacheKey {
        redis_set,
        cache_key,
    }
}
