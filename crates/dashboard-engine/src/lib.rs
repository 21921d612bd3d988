//! Evaluation engine for issue-dashboard.
//!
//! A dashboard starts life as a declarative configuration: a tree of
//! sections and widgets whose titles, values and queries are template
//! strings with embedded `{{ ... }}` expressions. This crate turns that
//! tree into a fully static one:
//!
//! - [`datemath`] is the date-arithmetic mini-language behind the `date`,
//!   `time` and `datetime` helpers.
//! - [`script`] resolves templates and runs setup/shutdown scripts against
//!   a scoped context, behind the injectable [`script::ScriptHost`] trait.
//! - [`query`] resolves search queries, paginates the remote API and
//!   caches partial results for the duration of one run.
//! - [`widget`] is the widget tree itself; every variant knows how to
//!   reduce itself to a static `Number`, `String`, `Graph` or `Table`
//!   widget.
//! - [`config`] parses the YAML/JSON configuration into the unevaluated
//!   tree.
//!
//! Evaluation is fail-fast: one bad widget aborts the entire run.

pub mod config;
pub mod context;
pub mod datemath;
pub mod error;
pub mod query;
pub mod script;
pub mod widget;

pub use config::{ConfigError, DashboardConfig, OutputConfig, OutputFormat};
pub use context::EvaluationContext;
pub use error::{EvaluateError, EvaluateResult};
pub use query::{ItemSearcher, QueryType};
pub use script::{FormulaHost, ScriptHost};
pub use widget::{Dashboard, NumberValue, Section, TableField, Widget};
