/*!
 * Encoding-preserving document I/O.
 *
 * Documents are decoded once, edited as text, and written back with the
 * same encoding, byte-order mark and trailing line-break sequence.
 */

pub mod encoding;
pub mod model;

pub use encoding::TextEncoding;
pub use model::{render, save, Document};
