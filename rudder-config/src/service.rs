//! Shared access to a registry from concurrent tasks
//!
//! The registry itself is single-threaded by design. [`ConfigService`]
//! wraps it in a dedicated task owning the registry outright; callers
//! talk to it over a channel and every request holds a oneshot for the
//! reply. Requests are serialized, so a batch set never interleaves
//! with a get or a rewrite.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use rudder_utils::{Result, RudderError};

use crate::commands::{self, ConfigValue};
use crate::registry::ConfigRegistry;
use crate::rewrite;

enum ServiceRequest {
    Get {
        patterns: Vec<String>,
        reply: oneshot::Sender<Vec<ConfigValue>>,
    },
    Set {
        pairs: Vec<(String, String)>,
        reply: oneshot::Sender<Result<()>>,
    },
    Rewrite {
        reply: oneshot::Sender<Result<()>>,
    },
    DebugDump {
        reply: oneshot::Sender<String>,
    },
}

/// Cloneable handle to the registry-owning task.
#[derive(Clone)]
pub struct ConfigService {
    tx: mpsc::Sender<ServiceRequest>,
}

impl ConfigService {
    /// Move `registry` into a new task and return a handle to it.
    /// `config_path` is the file a rewrite request targets; without
    /// one, rewrite requests fail.
    pub fn spawn(mut registry: ConfigRegistry, config_path: Option<PathBuf>) -> Self {
        let (tx, mut rx) = mpsc::channel::<ServiceRequest>(64);
        tokio::spawn(async move {
            while let Some(req) = rx.recv().await {
                match req {
                    ServiceRequest::Get { patterns, reply } => {
                        let _ = reply.send(commands::config_get(&registry, &patterns));
                    }
                    ServiceRequest::Set { pairs, reply } => {
                        let report = commands::config_set(&mut registry, &pairs);
                        let _ = reply.send(report.outcome);
                    }
                    ServiceRequest::Rewrite { reply } => {
                        let result = match &config_path {
                            Some(path) => commands::config_rewrite(&registry, path),
                            None => Err(RudderError::validation(
                                "The server is running without a config file",
                            )),
                        };
                        let _ = reply.send(result);
                    }
                    ServiceRequest::DebugDump { reply } => {
                        let _ = reply.send(rewrite::debug_dump(&registry));
                    }
                }
            }
            debug!("config service stopped");
        });
        Self { tx }
    }

    pub async fn get(&self, patterns: Vec<String>) -> Result<Vec<ConfigValue>> {
        let (reply, rx) = oneshot::channel();
        self.send(ServiceRequest::Get { patterns, reply }, rx).await
    }

    pub async fn set(&self, pairs: Vec<(String, String)>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(ServiceRequest::Set { pairs, reply }, rx).await?
    }

    pub async fn rewrite(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(ServiceRequest::Rewrite { reply }, rx).await?
    }

    pub async fn debug_dump(&self) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(ServiceRequest::DebugDump { reply }, rx).await
    }

    async fn send<T>(&self, req: ServiceRequest, rx: oneshot::Receiver<T>) -> Result<T> {
        self.tx
            .send(req)
            .await
            .map_err(|_| RudderError::Service("config service is not running".into()))?;
        rx.await
            .map_err(|_| RudderError::Service("config service dropped the request".into()))
    }
}
