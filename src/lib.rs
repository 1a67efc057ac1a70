//! Render MJML templates to HTML with the `mjml` command-line renderer.
//!
//! The renderer does the actual work. This crate builds the right command
//! line for the installed renderer version, moves the template and the
//! rendered HTML across the process boundary, and turns the renderer's
//! loosely structured output into a `Result`.
//!
//! ```no_run
//! use mjmlify::{Parser, RenderConfig};
//!
//! let parser = Parser::new(RenderConfig::default())?;
//! let html = parser.try_call("<mjml><mj-body></mj-body></mjml>")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Calls block until the renderer exits and no timeout is applied. Callers
//! that cannot tolerate a hung renderer must bound the call themselves.

pub mod command;
pub mod config;
pub mod discovery;
pub mod feature;
pub mod logging;
pub mod output;
pub mod parser;
pub mod transport;

pub use command::{Invocation, IoMode};
pub use config::{ConfigError, RenderConfig, ValidationLevel};
pub use discovery::{Renderer, SetupError};
pub use feature::{CliDialect, Feature, RendererVersion};
pub use logging::{DiagnosticSink, LogSink, NullSink};
pub use output::{classify, ClassifiedOutput};
pub use parser::{Parser, RenderError};
pub use transport::{ProcessTransport, RawOutput, Transport, TransportError};
