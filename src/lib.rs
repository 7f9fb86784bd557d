//! # yaml-key-audit
//!
//! Structural checks for YAML documents.
//!
//! `yaml-key-audit` walks the token stream of each YAML document once, tracking
//! the chain of mapping keys enclosing every key (its *ancestor path*, such as
//! `<root>:spec:template`), and reports forbidden keys, forbidden values,
//! integers and durations outside a range, and required keys missing from a
//! scope. Reports are rendered as human-readable text, JSON, or [SARIF].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use yaml_key_audit::{audit, config::Config, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let rules = config.compile().expect("invalid rules");
//! let report = audit::run_audit(Path::new("./manifests"), &rules, &config);
//!
//! if report.passed {
//!     println!("Audit passed!");
//! } else {
//!     let text = output::render(&report, output::OutputFormat::Pretty);
//!     print!("{text}");
//! }
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline:
//!
//! 1. **[`config`]**: load the TOML configuration and compile its rules.
//! 2. **[`source`]**: read a document, gate it on YAML syntax, scan it into
//!    [`token`]s.
//! 3. **[`checks`]**: the [`checks::Check`] trait and the engines behind the
//!    built-in check templates.
//! 4. **[`audit`]**: run every rule over every file in parallel and collect
//!    results.
//! 5. **[`finding`]**: core data types ([`finding::Finding`], [`finding::AuditReport`]).
//! 6. **[`output`]**: format reports as pretty text, JSON, or SARIF.
//!
//! ## Checks
//!
//! | Check | Reports |
//! |-------|---------|
//! | `forbidden-key` | Keys whose name matches a pattern |
//! | `forbidden-value` | Keys whose scalar value matches a pattern |
//! | `int-value-in-range` | Integer values outside `[min-value, max-value]` |
//! | `duration-in-range` | Durations (`500ms`, `3s`, ...) outside `[min-millis, max-millis]` |
//! | `required-key` | Scopes lacking a required key |
//! | `parsing-error` | Documents that are not well-formed YAML (built in) |
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod audit;
pub mod checks;
pub mod config;
pub mod finding;
pub mod output;
pub mod source;
pub mod token;
