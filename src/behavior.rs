//! Request timing and logging middleware.
//!
//! Every request is logged on entry with its debug representation, timed
//! across the continuation, and logged again with the response. Requests
//! whose measured seconds exceed the configured threshold additionally get a
//! `[PERFORMANCE]` warning. A failing or cancelled continuation produces only
//! the entry event.

use std::{any::type_name, fmt::Debug, future::Future};

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{dispatcher, info, warn, Dispatch};

use crate::{
    config::LoggingBehaviorConfig,
    pipeline::{Next, PipelineBehavior, Request},
};

#[derive(Debug, Clone, Default)]
pub struct LoggingBehavior {
    config: LoggingBehaviorConfig,
    sink: Option<Dispatch>,
}

impl LoggingBehavior {
    /// Logs to whatever dispatcher is current when an event fires.
    pub fn new(config: LoggingBehaviorConfig) -> Self {
        Self { config, sink: None }
    }

    /// Sends every event from this behavior to `sink`.
    pub fn with_sink(mut self, sink: Dispatch) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &LoggingBehaviorConfig {
        &self.config
    }

    /// Runs `next` with `request`, logging around it. The continuation's
    /// result is returned untouched, errors included.
    pub async fn log_around<Req, Resp, E, F, Fut>(&self, request: Req, next: F) -> Result<Resp, E>
    where
        Req: Debug,
        Resp: Debug,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = Result<Resp, E>>,
    {
        let request_name = short_type_name::<Req>();

        self.emit(|| {
            info!(
                request = request_name,
                response = short_type_name::<Resp>(),
                request_data = ?request,
                "[START] handle request"
            )
        });

        let started = Instant::now();
        let response = next(request).await?;
        let elapsed = started.elapsed();

        if let Some(seconds) = self.config.slow_seconds(elapsed) {
            self.emit(|| {
                warn!(
                    request = request_name,
                    time_taken = seconds,
                    "[PERFORMANCE] request exceeded slow threshold"
                )
            });
        }

        self.emit(|| info!(request = request_name, response = ?response, "[END] handled request"));

        Ok(response)
    }

    fn emit(&self, event: impl FnOnce()) {
        match &self.sink {
            Some(sink) => dispatcher::with_default(sink, event),
            None => event(),
        }
    }
}

#[async_trait]
impl<R, E> PipelineBehavior<R, E> for LoggingBehavior
where
    R: Request,
    E: Send + 'static,
{
    async fn handle(&self, request: R, next: Next<'_, R, E>) -> Result<R::Response, E> {
        self.log_around(request, |request| next.run(request)).await
    }
}

/// Last path segment of a type's name, without generic arguments.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
