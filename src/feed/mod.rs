//! Wire-format boundary: decoding the remote `.ics` document into entries
//! and regenerating a document from stored rows.

pub mod encoder;
pub mod fetcher;
pub mod parser;
