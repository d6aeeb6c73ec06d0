//! Window visibility to screen capture tools.
//!
//! The window is owned by a single [`VisibilityActor`]. Everything else holds a
//! [`CaptureVisibilityController`] and sends it commands, so the window is only
//! ever mutated from one place and no lock is needed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

const COMMAND_BUFFER: usize = 16;

/// Whether the window shows up in capture enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_hidden(hidden: bool) -> Self {
        if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    pub fn is_hidden(self) -> bool {
        self == Visibility::Hidden
    }
}

/// Argument of `setHidden`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisibilityRequest {
    pub hidden: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Window is no longer available")]
    WindowClosed,
    #[error("Window error: {0}")]
    Platform(String),
}

#[derive(Debug, thiserror::Error)]
pub enum VisibilityError {
    #[error("Visibility controller has stopped")]
    Stopped,
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// The window being shown to or hidden from capture tools.
///
/// Implementations must apply the change on the UI thread and return only
/// once it has taken effect.
#[async_trait]
pub trait CaptureSurface: Send + 'static {
    async fn set_excluded_from_capture(&mut self, excluded: bool) -> Result<(), SurfaceError>;
}

enum Command {
    SetHidden {
        hidden: bool,
        reply: oneshot::Sender<Result<(), SurfaceError>>,
    },
    Current {
        reply: oneshot::Sender<Visibility>,
    },
}

/// Cloneable handle to the window's capture visibility
#[derive(Clone)]
pub struct CaptureVisibilityController {
    commands: mpsc::Sender<Command>,
}

impl CaptureVisibilityController {
    /// Create a controller and the actor that owns `surface`.
    ///
    /// The actor does nothing until its [`VisibilityActor::run`] future is spawned.
    pub fn new<S: CaptureSurface>(surface: S) -> (Self, VisibilityActor<S>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let actor = VisibilityActor {
            surface,
            current: Visibility::Visible,
            commands: rx,
        };
        (Self { commands: tx }, actor)
    }

    /// Exclude (`true`) or include (`false`) the window in capture output.
    /// Resolves after the window has been updated.
    pub async fn set_hidden(&self, hidden: bool) -> Result<(), VisibilityError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::SetHidden { hidden, reply })
            .await
            .map_err(|_| VisibilityError::Stopped)?;
        rx.await.map_err(|_| VisibilityError::Stopped)??;
        Ok(())
    }

    pub async fn visibility(&self) -> Result<Visibility, VisibilityError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Current { reply })
            .await
            .map_err(|_| VisibilityError::Stopped)?;
        rx.await.map_err(|_| VisibilityError::Stopped)
    }
}

/// Sole owner of the window's capture visibility
pub struct VisibilityActor<S> {
    surface: S,
    current: Visibility,
    commands: mpsc::Receiver<Command>,
}

impl<S: CaptureSurface> VisibilityActor<S> {
    /// Process commands until every controller handle is dropped
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::SetHidden { hidden, reply } => {
                    let result = self.apply(Visibility::from_hidden(hidden)).await;
                    let _ = reply.send(result);
                }
                Command::Current { reply } => {
                    let _ = reply.send(self.current);
                }
            }
        }
        tracing::debug!("Visibility actor stopped");
    }

    async fn apply(&mut self, target: Visibility) -> Result<(), SurfaceError> {
        if target == self.current {
            tracing::debug!("Window already {:?}", target);
            return Ok(());
        }

        if let Err(e) = self.surface.set_excluded_from_capture(target.is_hidden()).await {
            tracing::error!("Failed to set window {:?}: {}", target, e);
            return Err(e);
        }

        tracing::info!("Window capture visibility: {:?} -> {:?}", self.current, target);
        self.current = target;
        Ok(())
    }
}
