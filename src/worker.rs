//! Background lookups
//!
//! Requests run on a bounded pool of blocking threads. Each finished request
//! is sent back as an `Outcome` over an unbounded channel which the UI
//! thread drains; workers never touch UI state themselves.

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use tokio::runtime::{Builder, Runtime};

use crate::{
    details,
    error::AppResult,
    poster::{self, PosterSource},
    provider::LookupProvider,
    search,
    state::{Outcome, Request},
};

pub struct Worker {
    runtime: Option<Runtime>,
    provider: Arc<dyn LookupProvider>,
    posters: Arc<dyn PosterSource>,
    sender: Sender<Outcome>,
}

impl Worker {
    pub fn new(
        workers: usize,
        provider: Arc<dyn LookupProvider>,
        posters: Arc<dyn PosterSource>,
    ) -> AppResult<(Self, Receiver<Outcome>)> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(workers.max(1))
            .thread_name("movie-rating-worker")
            .build()?;

        tracing::info!(workers, provider = provider.name(), "Worker pool started");

        let (sender, receiver) = async_channel::unbounded();
        Ok((
            Self {
                runtime: Some(runtime),
                provider,
                posters,
                sender,
            },
            receiver,
        ))
    }

    /// Queue a request; its outcome arrives on the receiver
    pub fn submit(&self, request: Request) {
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };

        let provider = self.provider.clone();
        let posters = self.posters.clone();
        let sender = self.sender.clone();
        runtime.spawn_blocking(move || {
            let outcome = perform(request, provider.as_ref(), posters.as_ref());
            if sender.send_blocking(outcome).is_err() {
                tracing::debug!("Outcome receiver closed; dropping result");
            }
        });
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // In-flight lookups must not hold up process exit
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Run one request to completion on the current thread
pub fn perform(
    request: Request,
    provider: &dyn LookupProvider,
    posters: &dyn PosterSource,
) -> Outcome {
    tracing::trace!(kind = ?request.kind(), "Performing request");
    match request {
        Request::Search { generation, title } => Outcome::Search {
            generation,
            result: search::run(provider, &title),
        },
        Request::Details { generation, id } => Outcome::Details {
            generation,
            result: details::run(provider, &id),
        },
        Request::Random { generation, id } => Outcome::Random {
            generation,
            result: details::run(provider, &id),
        },
        Request::Poster { generation, url } => Outcome::Poster {
            generation,
            image: poster::fetch(posters, url.as_deref()),
        },
    }
}
