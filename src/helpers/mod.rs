//! Helper functions shared by the views and the render pipeline

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
