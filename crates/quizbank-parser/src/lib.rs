//! Parsing of quiz bank payloads.
//!
//! A payload is UTF-8 text with one question per line:
//!
//! ```text
//! FREE;q1;Paris
//! RADIO;q2;a,b,c;b
//! CHECK;q3;x,y,z;x,z
//! ```

pub mod error;
pub mod payload;
pub mod question;

pub use error::ParseError;
pub use payload::{ParseOptions, normalize_tag, parse, parse_bytes, parse_bytes_with, parse_line, parse_with};
pub use question::{Question, QuestionKind};
