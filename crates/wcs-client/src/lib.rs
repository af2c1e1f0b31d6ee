//! # WCS Client SDK
//!
//! Client SDK for WCS cloud object storage.
//!
//! ## Features
//!
//! - **Config files**: INI-style configuration with typed options and defaults
//! - **Process-wide config**: one shared [`Config`], initialized once
//! - **File management**: signed move/copy/fetch/delete requests and task status
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use wcs_client::{Config, Fmgr, FmgrOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load the process-wide config
//!     let config = Config::instance(Some(Path::new("wcs.cfg")))?;
//!
//!     // Move a file
//!     let fmgr = Fmgr::from_config(config)?;
//!     let fops = "resource/bucket:a.txt&bucket/bucket:b.txt";
//!     let response = fmgr.fmgr_move(fops, FmgrOptions::new()).await?;
//!     println!("{} {}", response.status, response.body);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
mod error;
pub mod fmgr;
pub mod http;
mod types;
pub mod util;

pub use auth::Auth;
pub use config::{Config, ConfigDumper, ConfigParser, MalformedLine, OptionKind, OptionValue, Settings};
pub use error::{ClientError, Result};
pub use fmgr::Fmgr;
pub use http::{ApiResponse, HttpClient};
pub use types::*;
