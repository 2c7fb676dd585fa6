/*!
 * Translation services.
 *
 * - `cache`: bounded, expiring translation cache
 * - `gateway`: cache-first lookups with graceful degradation
 */

pub use self::cache::{CachePolicy, CacheSnapshot, CacheStats, TranslationCache};
pub use self::gateway::TranslationGateway;

pub mod cache;
pub mod gateway;
