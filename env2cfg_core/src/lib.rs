//! `env2cfg_core` is the core library for the env2cfg config renderer. It
//! substitutes delimiter-bounded placeholders in a text template with values
//! taken from command-line overrides, the process environment and a dotenv
//! file, and can run in reverse to list the placeholders a template uses.
//!
//! ## Processing Pipeline
//!
//! ```text
//! RunConfig
//!   → validate (paths, delimiters, permission bits)
//!   → run
//!       render:   dotenv permission check → dotenv load → scan each line → resolve each placeholder
//!       generate: scan each line → collect distinct placeholder names
//!   → RunReport (document + warnings)
//!   → write_output (file with fixed mode) or standard output
//! ```
//!
//! ## Variable Precedence
//!
//! 1. Command-line overrides (`-e KEY=value`) always win.
//! 2. The process environment.
//! 3. The dotenv file.
//!
//! With `env_override` set, the process environment is skipped and the dotenv
//! file is the only source besides command-line overrides.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use env2cfg_core::OsPermissions;
//! use env2cfg_core::ProcessEnvironment;
//! use env2cfg_core::RunConfig;
//! use env2cfg_core::run;
//!
//! let mut config = RunConfig::new("config.yml.tpl");
//! config.env_file = Some("config.env".into());
//!
//! let config = config.validate().unwrap();
//! let report = run(&config, ProcessEnvironment, &OsPermissions).unwrap();
//! print!("{}", report.document);
//!
//! for warning in &report.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

pub use config::*;
pub use dotenv::*;
pub use engine::*;
pub use error::*;
pub use permissions::*;
pub use resolver::*;
pub use run::*;

pub mod config;
mod dotenv;
mod engine;
#[allow(unused_assignments)]
mod error;
mod permissions;
mod resolver;
mod run;
pub mod scanner;
