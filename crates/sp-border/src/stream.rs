use rayon::prelude::*;
use sp_core::{Error, Result};

#[derive(Debug)]
enum Backend {
    Inline,
    Global,
    Pool(rayon::ThreadPool),
}

/// Execution queue for border operations.
///
/// Work submitted through a stream has finished when the submitting call
/// returns, so operations on one stream complete in submission order.
#[derive(Debug)]
pub struct Stream {
    backend: Backend,
}

impl Stream {
    /// Runs everything on the calling thread.
    pub fn inline() -> Self {
        Self {
            backend: Backend::Inline,
        }
    }

    /// Uses the global rayon pool.
    pub fn global() -> Self {
        Self {
            backend: Backend::Global,
        }
    }

    /// Owns a dedicated pool of `threads` workers (0 lets rayon choose).
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sp-border-{i}"))
            .build()
            .map_err(|e| Error::Queue(e.to_string()))?;
        Ok(Self {
            backend: Backend::Pool(pool),
        })
    }

    pub fn num_threads(&self) -> usize {
        match &self.backend {
            Backend::Inline => 1,
            Backend::Global => rayon::current_num_threads(),
            Backend::Pool(pool) => pool.current_num_threads(),
        }
    }

    /// Applies `f` to every item, in parallel unless the stream is inline.
    pub(crate) fn for_each_mut<T, F>(&self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(&mut T) + Sync + Send,
    {
        match &self.backend {
            Backend::Inline => items.iter_mut().for_each(f),
            Backend::Global => items.par_iter_mut().for_each(f),
            Backend::Pool(pool) => pool.install(|| items.par_iter_mut().for_each(f)),
        }
    }
}

impl Default for Stream {
    fn default() -> Self {
        Self::global()
    }
}
