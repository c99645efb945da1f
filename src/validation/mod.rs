/*!
 * Link liveness checking.
 *
 * - `probe`: the `LinkProbe` seam and its HTTP implementation
 * - `alternates`: alternate spellings of publication URLs
 * - `limiter`: per-host in-flight limits
 * - `validator`: cached, bounded, cancellable validation of many links
 */

pub mod alternates;
pub mod limiter;
pub mod probe;
pub mod validator;

pub use alternates::alternate_urls;
pub use probe::{HttpProbe, LinkProbe};
pub use validator::{CancelFlag, LinkValidator, ValidationOutcome, ValidatorOptions};
