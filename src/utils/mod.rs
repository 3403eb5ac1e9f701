pub mod validate;

pub use validate::{MAX_REMARKS_CHARS, validate_remarks};
