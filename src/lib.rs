//! # chiefr
//!
//! Routes patches and pull requests to the project segments that own them.
//!
//! A maintainers file splits a codebase into named segments, each with its
//! chiefs, a canonical repository and regular expressions over file paths
//! and diff content. chiefr matches a changeset against those rules, tells
//! contributors where to send it, and labels, assigns or redirects pull
//! requests on the tracker.
//!
//! ## Quick Start
//!
//! ```rust
//! use chiefr::{resolve, FilePatch, MaintainersConfig};
//!
//! let config = MaintainersConfig::parse(
//!     "[docs]\nChiefs = alice\nRepository = https://github.com/acme/docs\n\
//!      FilePatterns = \\.md$\n",
//! )?;
//! let patches = vec![FilePatch::added("README.md", "hello\n")];
//! let segments = resolve(&config, &patches).into_owned()?;
//! assert_eq!(segments.repositories(), vec!["https://github.com/acme/docs"]);
//! # Ok::<(), chiefr::ChiefrError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod git;
pub mod matcher;
pub mod patch;
pub mod resolve;
pub mod segment;
pub mod tracker;
pub mod utils;

pub use crate::cli::Cli;
pub use crate::config::MaintainersConfig;
pub use crate::error::{exit_code_for, ChiefrError, USAGE_EXIT_CODE};
pub use crate::patch::FilePatch;
pub use crate::resolve::{resolve, ResolvedSet, Resolution};
pub use crate::segment::{Segment, SegmentDefinition};
