//! Capture visibility of a Tauri window.
//!
//! Content protection is what macOS exposes as `NSWindow.sharingType`:
//! protected windows are left out of screen and window capture.

use async_trait::async_trait;
use hexmac_core::{CaptureSurface, SurfaceError};
use tauri::{Runtime, WebviewWindow};
use tokio::sync::oneshot;

pub struct WindowSurface<R: Runtime> {
    window: WebviewWindow<R>,
}

impl<R: Runtime> WindowSurface<R> {
    pub fn new(window: WebviewWindow<R>) -> Self {
        Self { window }
    }
}

#[async_trait]
impl<R: Runtime> CaptureSurface for WindowSurface<R> {
    async fn set_excluded_from_capture(&mut self, excluded: bool) -> Result<(), SurfaceError> {
        let (tx, rx) = oneshot::channel();
        let window = self.window.clone();

        // Window state is only touched on the main thread; reply once it is done
        self.window
            .run_on_main_thread(move || {
                let _ = tx.send(window.set_content_protected(excluded));
            })
            .map_err(|e| SurfaceError::Platform(e.to_string()))?;

        rx.await
            .map_err(|_| SurfaceError::WindowClosed)?
            .map_err(|e| SurfaceError::Platform(e.to_string()))
    }
}
