use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::command::Invocation;
use crate::config::RenderConfig;
use crate::discovery::{Renderer, SetupError};
use crate::logging::{DiagnosticSink, LogSink};
use crate::output::classify;
use crate::transport::{OutputTarget, ProcessTransport, Transport, TransportError};

/// A full document is wrapped in `<mjml>` ... `</mjml>`; anything else is a partial.
static ROOT_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<mjml.*>.*</mjml>").unwrap());

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template is empty")]
    EmptyTemplate,
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Renders MJML templates with an external renderer.
///
/// Each call spawns one renderer process and blocks until it exits. A parser
/// holds no per-call state and can be shared between threads.
pub struct Parser<T: Transport = ProcessTransport, S: DiagnosticSink = LogSink> {
    config: RenderConfig,
    renderer: Renderer,
    transport: T,
    sink: S,
}

impl Parser {
    /// Detects the renderer eagerly; fails when none is usable.
    pub fn new(config: RenderConfig) -> Result<Self, SetupError> {
        let renderer = Renderer::detect(&config)?;
        Ok(Self::with_renderer(config, renderer))
    }

    /// Uses an already detected renderer.
    pub fn with_renderer(config: RenderConfig, renderer: Renderer) -> Self {
        Self {
            config,
            renderer,
            transport: ProcessTransport,
            sink: LogSink,
        }
    }
}

impl<T: Transport, S: DiagnosticSink> Parser<T, S> {
    pub fn with_transport<U: Transport>(self, transport: U) -> Parser<U, S> {
        Parser {
            config: self.config,
            renderer: self.renderer,
            transport,
            sink: self.sink,
        }
    }

    pub fn with_sink<U: DiagnosticSink>(self, sink: U) -> Parser<T, U> {
        Parser {
            config: self.config,
            renderer: self.renderer,
            transport: self.transport,
            sink,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Renders a template, discarding any diagnostics on failure.
    ///
    /// Use [`Parser::try_call`] when the reason for a failure matters.
    pub fn call(&self, template: &str) -> Option<String> {
        self.try_call(template).ok()
    }

    /// Renders a template.
    ///
    /// Partial templates (no `<mjml>` root) are returned unchanged without
    /// running the renderer. Any renderer stderr fails the call; validation
    /// warnings alone do not.
    pub fn try_call(&self, template: &str) -> Result<String, RenderError> {
        if template.is_empty() {
            return Err(RenderError::EmptyTemplate);
        }
        if is_partial(template) {
            debug!("Template has no <mjml> root, returning it unchanged");
            return Ok(template.to_string());
        }

        // Holds the temporary output file, if any, until the call returns.
        let target = OutputTarget::for_template(template)?;
        let invocation = Invocation::build(
            &self.renderer.path,
            &self.config,
            &self.renderer.version,
            target.io_mode(),
        );
        let raw = self.transport.execute(&invocation, template)?;
        let parsed = classify(&raw.stdout);

        if !raw.stderr.is_empty() {
            self.sink.error(&raw.stderr);
        }
        if !parsed.warnings.is_empty() {
            self.sink.warn(&parsed.warnings);
        }

        if !raw.stderr.is_empty() {
            let mut message = raw.stderr;
            if !parsed.warnings.is_empty() {
                message.push('\n');
                message.push_str(&parsed.warnings);
            }
            return Err(RenderError::InvalidTemplate(message));
        }

        Ok(parsed.result)
    }
}

pub fn is_partial(template: &str) -> bool {
    !ROOT_TAGS.is_match(template)
}
