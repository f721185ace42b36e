//! HTTP client for the REVI review question-answering backend.

pub mod backend;
pub mod error;
pub mod models;
pub mod upload;

pub use backend::*;
pub use error::*;
pub use models::*;
pub use upload::*;
