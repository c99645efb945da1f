/*!
 * Table handling without a full HTML parser.
 *
 * - `locator`: finds the single table body in a document
 * - `tokenizer`: splits it into rows and cells with source offsets
 * - `links`: extracts and rewrites the link of a cell
 * - `patch`: splices replacements back into row, table and document text
 */

pub mod links;
pub mod locator;
pub mod patch;
pub mod tokenizer;

pub use links::{extract_href, LinkCandidate};
pub use locator::{locate, TableSpan};
pub use patch::{apply_document, apply_row, apply_table_body};
pub use tokenizer::{split_cells, split_rows, Cell, Row};
