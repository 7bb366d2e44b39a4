pub use crate::errors::{ApiError, Result};
