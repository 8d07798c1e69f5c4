/// HTTP middleware
///
/// - `rate_limit`: Per-client token bucket
/// - `security`: Security response headers

pub mod rate_limit;
pub mod security;
