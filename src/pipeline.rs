use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

/// A message dispatched through a [`Pipeline`].
pub trait Request: Debug + Send + 'static {
    type Response: Debug + Send + 'static;
}

#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    type Error: Send + 'static;

    async fn handle(&self, request: R) -> Result<R::Response, Self::Error>;
}

/// Middleware wrapped around a [`RequestHandler`]. Implementations call
/// `next.run(request)` to continue down the pipeline.
#[async_trait]
pub trait PipelineBehavior<R: Request, E: Send + 'static>: Send + Sync {
    async fn handle(&self, request: R, next: Next<'_, R, E>) -> Result<R::Response, E>;
}

/// The remainder of a pipeline: the behaviors not yet entered, then the handler.
pub struct Next<'a, R: Request, E: Send + 'static> {
    behaviors: &'a [Arc<dyn PipelineBehavior<R, E>>],
    handler: &'a dyn RequestHandler<R, Error = E>,
}

impl<'a, R: Request, E: Send + 'static> Next<'a, R, E> {
    pub async fn run(self, request: R) -> Result<R::Response, E> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                let next = Next {
                    behaviors: rest,
                    handler: self.handler,
                };
                behavior.handle(request, next).await
            }
            None => self.handler.handle(request).await,
        }
    }
}

pub struct Pipeline<R: Request, H: RequestHandler<R>> {
    handler: H,
    behaviors: Vec<Arc<dyn PipelineBehavior<R, H::Error>>>,
}

impl<R: Request, H: RequestHandler<R>> Pipeline<R, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            behaviors: Vec::new(),
        }
    }

    /// Appends a behavior. Earlier behaviors wrap later ones.
    pub fn with_behavior<B>(mut self, behavior: B) -> Self
    where
        B: PipelineBehavior<R, H::Error> + 'static,
    {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    pub async fn send(&self, request: R) -> Result<R::Response, H::Error> {
        Next {
            behaviors: &self.behaviors,
            handler: &self.handler,
        }
        .run(request)
        .await
    }
}
