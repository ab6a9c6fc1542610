//! Request handlers behind the router.
//!
//! - **`resolver`**: confines request paths to the web root and classifies them
//! - **`static_files`**: reads a file and builds its response
//! - **`listing`**: serves a directory's `index.html` or an HTML listing
//! - **`form`**: decodes URL-encoded POST bodies and echoes them back

pub mod form;
pub mod listing;
pub mod resolver;
pub mod static_files;

pub use resolver::{PathResolver, ResolvedPath};
