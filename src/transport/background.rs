//! Background executor.
//!
//! A [`BackgroundSession`] stages response bodies on disk from detached
//! runtime tasks, so a transfer keeps going after the code that issued it has
//! returned. Results come back over a channel registered with each download;
//! the session never holds a reference to its caller.
//!
//! Task lifecycle: `Idle -> Requested -> Completed`. A task completes with a
//! failure if the session is invalidated before the transfer finishes, or if
//! the staged file cannot be read back. Completion is one-shot and the task is
//! forgotten afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use reqwest::{StatusCode, Url};
use tempfile::{NamedTempFile, TempDir, TempPath};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tracing::{Instrument, debug, info_span, warn};

use crate::client::Client;
use crate::endpoint::Endpoint;
use crate::error::{DecodedResponse, Error};
use crate::fetch::{ApiKey, BasicClient, HttpClient};

pub type TaskId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Requested,
    Completed,
}

/// Terminal result of one background task.
#[derive(Debug)]
pub struct Delivery<T> {
    pub task: TaskId,
    pub result: DecodedResponse<T>,
}

type Registry = Arc<Mutex<HashMap<TaskId, TaskState>>>;

fn lock(registry: &Registry) -> std::sync::MutexGuard<'_, HashMap<TaskId, TaskState>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

struct BackgroundTask<T> {
    id: TaskId,
    state: TaskState,
    deliver: Option<UnboundedSender<Delivery<T>>>,
    registry: Registry,
}

impl<T> BackgroundTask<T> {
    fn new(id: TaskId, deliver: UnboundedSender<Delivery<T>>, registry: Registry) -> Self {
        lock(&registry).insert(id, TaskState::Idle);
        Self {
            id,
            state: TaskState::Idle,
            deliver: Some(deliver),
            registry,
        }
    }

    fn mark_requested(&mut self) {
        if self.state == TaskState::Idle {
            self.state = TaskState::Requested;
            lock(&self.registry).insert(self.id, TaskState::Requested);
        }
    }

    /// Delivers `result` unless this task already completed. Returns whether
    /// anything was delivered.
    fn complete(&mut self, result: DecodedResponse<T>) -> bool {
        let Some(deliver) = self.deliver.take() else {
            return false;
        };

        self.state = TaskState::Completed;
        lock(&self.registry).remove(&self.id);

        if deliver
            .send(Delivery {
                task: self.id,
                result,
            })
            .is_err()
        {
            warn!(task = self.id, "Background result receiver dropped; result discarded");
        }
        true
    }
}

impl<T> Drop for BackgroundTask<T> {
    // A task dropped before completing (runtime shutdown, panic) still
    // delivers exactly once.
    fn drop(&mut self) {
        self.complete(Err(Error::BackgroundSessionInvalid));
    }
}

enum DownloadDir {
    Temp(TempDir),
    Fixed(PathBuf),
}

impl DownloadDir {
    fn path(&self) -> &Path {
        match self {
            DownloadDir::Temp(dir) => dir.path(),
            DownloadDir::Fixed(path) => path.as_path(),
        }
    }
}

/// Long-lived session for background downloads.
pub struct BackgroundSession<C = ApiKey<BasicClient>> {
    http: Arc<C>,
    base_url: Url,
    runtime: Handle,
    dir: Arc<DownloadDir>,
    registry: Registry,
    next_id: AtomicU64,
    invalidated: watch::Sender<bool>,
}

impl<C: HttpClient + 'static> BackgroundSession<C> {
    /// Creates a session sharing `client`'s HTTP stack and base URL.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnableToBuildRequest`] when no Tokio runtime is
    /// reachable, or [`Error::BackgroundFileLoad`] when the download directory
    /// cannot be created.
    pub fn new(client: &Client<C>) -> Result<Self, Error> {
        let runtime = client.runtime().ok_or_else(|| {
            Error::UnableToBuildRequest("background session needs a Tokio runtime".to_string())
        })?;

        let dir = match client.download_dir() {
            Some(path) => {
                std::fs::create_dir_all(path).map_err(|source| Error::BackgroundFileLoad {
                    path: path.to_path_buf(),
                    source,
                })?;
                DownloadDir::Fixed(path.to_path_buf())
            }
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("wmata-")
                    .tempdir()
                    .map_err(|source| Error::BackgroundFileLoad {
                        path: std::env::temp_dir(),
                        source,
                    })?;
                DownloadDir::Temp(dir)
            }
        };

        let (invalidated, _) = watch::channel(false);

        Ok(Self {
            http: Arc::clone(client.http()),
            base_url: client.base_url().clone(),
            runtime,
            dir: Arc::new(dir),
            registry: Arc::default(),
            next_id: AtomicU64::new(1),
            invalidated,
        })
    }

    /// Issues `endpoint` in the background.
    ///
    /// `deliver` receives exactly one [`Delivery`] for the returned id. It is
    /// buffered until the receiver reads it, and dropped if the receiver is
    /// gone by then.
    pub fn download<E: Endpoint>(
        &self,
        endpoint: E,
        deliver: UnboundedSender<Delivery<E::Response>>,
    ) -> TaskId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut task = BackgroundTask::new(id, deliver, Arc::clone(&self.registry));
        let mut invalidated = self.invalidated.subscribe();

        let http = Arc::clone(&self.http);
        let base_url = self.base_url.clone();
        let dir = Arc::clone(&self.dir);

        let span = info_span!(
            "background_download",
            task = id,
            endpoint = std::any::type_name::<E>()
        );

        self.runtime.spawn(
            async move {
                task.mark_requested();

                let (file, artifact) = match stage(dir.path()) {
                    Ok(staged) => staged.into_parts(),
                    Err(e) => {
                        warn!(error = %e, "Could not stage background download");
                        task.complete(Err(e));
                        return;
                    }
                };

                let transferred = tokio::select! {
                    biased;
                    _ = session_invalidated(&mut invalidated) => Err(Error::BackgroundSessionInvalid),
                    result = transfer(&*http, &base_url, &endpoint, tokio::fs::File::from_std(file), &artifact) => result,
                };

                let result = match transferred {
                    Ok(status) => load_artifact(artifact)
                        .await
                        .and_then(|bytes| super::finish(status, &bytes)),
                    Err(e) => {
                        drop(artifact);
                        Err(e)
                    }
                };

                match &result {
                    Ok(_) => debug!("Background task completed"),
                    Err(e) => warn!(error = %e, kind = ?e.kind(), "Background task failed"),
                }
                task.complete(result);
            }
            .instrument(span),
        );

        id
    }

    /// `None` once the task has completed and been discarded (or never existed).
    pub fn state(&self, id: TaskId) -> Option<TaskState> {
        lock(&self.registry).get(&id).copied()
    }

    /// Number of tasks not yet completed.
    pub fn pending(&self) -> usize {
        lock(&self.registry).len()
    }

    /// Fails every task whose transfer has not finished, and every task issued
    /// afterwards, with [`Error::BackgroundSessionInvalid`].
    pub fn invalidate(&self) {
        self.invalidated.send_replace(true);
    }

    pub fn is_valid(&self) -> bool {
        !*self.invalidated.borrow()
    }

    pub fn download_dir(&self) -> &Path {
        self.dir.path()
    }
}

async fn session_invalidated(invalidated: &mut watch::Receiver<bool>) {
    if invalidated.wait_for(|invalid| *invalid).await.is_err() {
        // Session handle dropped without invalidating: keep transferring.
        std::future::pending::<()>().await;
    }
}

/// Creates a uniquely named staging file in `dir`. The file is removed when
/// its [`TempPath`] is dropped, so sessions can share one directory.
fn stage(dir: &Path) -> Result<NamedTempFile, Error> {
    tempfile::Builder::new()
        .prefix("task-")
        .suffix(".download")
        .tempfile_in(dir)
        .map_err(|source| Error::BackgroundFileLoad {
            path: dir.to_path_buf(),
            source,
        })
}

/// Sends the request and streams the body into `file`.
async fn transfer<C, E>(
    http: &C,
    base_url: &Url,
    endpoint: &E,
    mut file: tokio::fs::File,
    artifact: &Path,
) -> Result<StatusCode, Error>
where
    C: HttpClient + ?Sized,
    E: Endpoint,
{
    let request = endpoint.request(base_url)?;
    debug!(url = %request.url(), artifact = %artifact.display(), "Starting background transfer");

    let mut response = http.execute(request).await?;
    let status = response.status();

    let file_error = |source| Error::BackgroundFileLoad {
        path: artifact.to_path_buf(),
        source,
    };

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await.map_err(file_error)?;
    }
    file.flush().await.map_err(file_error)?;

    Ok(status)
}

/// Reads a staged body back and removes the file.
async fn load_artifact(artifact: TempPath) -> Result<Vec<u8>, Error> {
    let bytes = tokio::fs::read(&artifact)
        .await
        .map_err(|source| Error::BackgroundFileLoad {
            path: artifact.to_path_buf(),
            source,
        })?;

    let path = artifact.to_path_buf();
    if let Err(e) = artifact.close() {
        debug!(path = %path.display(), error = %e, "Could not remove staged download");
    }
    Ok(bytes)
}
