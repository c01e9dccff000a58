mod types;
mod validation;

pub use types::{
    BackendKind, Partition, ResolvedConfig, ServiceConfig, DEFAULT_CACHE_ID, DEFAULT_PREFIX,
    DEFAULT_SCRIPT_ID, DEFAULT_USER_ID,
};
pub use validation::{resolve, validate_token, validate_url};
