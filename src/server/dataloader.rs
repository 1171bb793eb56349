use std::collections::HashMap;
use std::fmt::Debug;
use std::future::poll_fn;
use std::hash::Hash;
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::task::{Poll, Waker};

use parking_lot::Mutex;

pub trait BatchLoader: Send + 'static {
    type K: Hash + Eq + Clone + Debug + Send + 'static;
    type V: Clone + Send + 'static;

    /// Keys missing from the returned map resolve to `None`.
    fn load_batch(
        &mut self,
        keys: Vec<Self::K>,
    ) -> impl Future<Output = HashMap<Self::K, Self::V>> + Send + 'static;
}

enum Entry<V> {
    Requested(Vec<Waker>),
    Ready(Option<V>),
}

struct LoaderInner<B: BatchLoader> {
    values: HashMap<B::K, Entry<B::V>>,
    pending_keys: HashMap<B::K, Vec<Waker>>,
    load_batch: B,
}

type BatchFuture<B> =
    Pin<Box<dyn Future<Output = HashMap<<B as BatchLoader>::K, <B as BatchLoader>::V>> + Send>>;

/// Collects the keys requested by [`DataLoader::load`] while the future given
/// to [`DataLoader::wrap`] makes progress, and resolves them with a single
/// [`BatchLoader::load_batch`] call once that future cannot advance any further.
///
/// Resolved values are cached for the lifetime of the loader; [`DataLoader::clear`]
/// drops them.
pub struct DataLoader<B: BatchLoader> {
    inner: Arc<Mutex<LoaderInner<B>>>,
}
impl<B: BatchLoader> Clone for DataLoader<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: BatchLoader> DataLoader<B> {
    pub fn new(load_batch: B) -> Self {
        let inner = LoaderInner {
            load_batch,
            values: Default::default(),
            pending_keys: Default::default(),
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Only makes progress while polled inside [`DataLoader::wrap`].
    pub fn load(&self, key: B::K) -> impl Future<Output = Option<B::V>> + Send + '_ {
        poll_fn(move |cx| {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            let wakers = match inner.values.get_mut(&key) {
                Some(Entry::Ready(v)) => {
                    return Poll::Ready(v.clone());
                }
                Some(Entry::Requested(wakers)) => wakers,
                None => inner.pending_keys.entry(key.clone()).or_insert_with(|| {
                    tracing::trace!(?key, "queueing key for the next batch");
                    vec![]
                }),
            };

            wakers.push(cx.waker().clone());
            Poll::Pending
        })
    }

    /// Drops every resolved value. Keys currently being loaded are kept.
    pub fn clear(&self) {
        self.inner
            .lock()
            .values
            .retain(|_, entry| matches!(entry, Entry::Requested(_)));
    }

    pub async fn wrap<O>(&self, fut: impl Future<Output = O>) -> O {
        let mut currently_loading: Option<(Vec<B::K>, BatchFuture<B>)> = None;

        let mut fut = pin!(fut);
        poll_fn(move |cx| {
            if let Some((keys, loading)) = currently_loading.as_mut() {
                let Poll::Ready(values) = loading.as_mut().poll(cx) else {
                    return Poll::Pending;
                };
                let keys = std::mem::take(keys);
                currently_loading = None;
                self.resolve(keys, values);
            }

            let res = fut.as_mut().poll(cx);
            if res.is_pending() {
                // We have polled the inner future once, during which it may have registered more
                // keys to load.
                let mut inner = self.inner.lock();

                if !inner.pending_keys.is_empty() {
                    let mut keys = Vec::with_capacity(inner.pending_keys.len());
                    for (k, v) in std::mem::take(&mut inner.pending_keys) {
                        keys.push(k.clone());
                        inner.values.insert(k, Entry::Requested(v));
                    }
                    tracing::debug!(?keys, "loading batch");

                    let load_future: BatchFuture<B> =
                        Box::pin(inner.load_batch.load_batch(keys.clone()));
                    currently_loading = Some((keys, load_future));

                    // Wake immediately, to instruct the runtime to call `poll` again.
                    cx.waker().wake_by_ref();
                }
            }
            res
        })
        .await
    }

    /// Stores the batch result and wakes all the `load` calls waiting on it.
    fn resolve(&self, keys: Vec<B::K>, mut values: HashMap<B::K, B::V>) {
        let mut inner = self.inner.lock();
        for k in keys {
            let v = values.remove(&k);
            if let Some(Entry::Requested(wakers)) = inner.values.insert(k, Entry::Ready(v)) {
                wakers.into_iter().for_each(Waker::wake);
            }
        }
    }
}
