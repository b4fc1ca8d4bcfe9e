//! Output generation for JSON and Markdown.
//!
//! # Submodules
//!
//! - [`json`]: writes the [`SitePage`](crate::models::SitePage) for the front end
//! - [`markdown`]: renders the full page as a readable document
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── latest.json
//! └── 2025-05-06/
//!     ├── morning.json
//!     └── evening.json
//!
//! markdown_output_dir/
//! ├── 2025-05-06_morning.md
//! └── 2025-05-06_evening.md
//! ```

pub mod json;
pub mod markdown;
