//! Client side of the catalog.
//!
//! - **api**: typed HTTP gateway to the handlers
//! - **form**: add-movie form validation and coercion
//! - **view**: browse/search state and the movie details dialog

mod api;
mod error;
pub mod form;
pub mod view;

pub use api::CatalogClient;
pub use error::{ClientError, Result};
