//! Output generation: page files, edition contents, and the root index.
//!
//! # Submodules
//!
//! - [`paths`]: Resolves every output location from the root and the date
//! - [`markdown`]: Renders and writes pages and the edition contents file
//! - [`indexes`]: Scans past editions and rewrites `index.md`
//!
//! # Output Structure
//!
//! ```text
//! output/
//! ├── index.md                          # rebuilt every run
//! └── 2025-01/
//!     └── 2025-01-05/
//!         ├── edition_2025-01-05.md     # contents of the day
//!         ├── page_01.md
//!         └── page_16.md
//! ```

pub mod indexes;
pub mod markdown;
pub mod paths;
