use std::time::Duration;

use tokio::sync::watch;

use crate::ViewerError;

/// Identifier of an element the presentation layer lays out for a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountPoint(pub String);

/// The two viewer mount points as laid out by one render pass.
///
/// `generation` changes every time the editor area is torn down and laid out
/// again; a viewer created against an older generation is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoints {
    pub original: MountPoint,
    pub modified: MountPoint,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct MountState {
    current: Option<MountPoints>,
    generation: u64,
}

/// Publisher side, owned by the presentation layer.
#[derive(Debug)]
pub struct MountSignal {
    tx: watch::Sender<MountState>,
}

impl Default for MountSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl MountSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MountState::default());
        Self { tx }
    }

    /// Marks the editor area as laid out. Republishing an area that is
    /// already present keeps its generation.
    pub fn publish(&self, original: MountPoint, modified: MountPoint) {
        self.tx.send_if_modified(|state| {
            if state.current.is_some() {
                return false;
            }
            state.generation += 1;
            state.current = Some(MountPoints {
                original,
                modified,
                generation: state.generation,
            });
            true
        });
    }

    /// Marks the editor area as gone.
    pub fn withdraw(&self) {
        self.tx.send_if_modified(|state| state.current.take().is_some());
    }

    pub fn current(&self) -> Option<MountPoints> {
        self.tx.borrow().current.clone()
    }

    pub fn subscribe(&self) -> MountWatcher {
        MountWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

/// Consumer side, owned by the viewer controller.
#[derive(Debug, Clone)]
pub struct MountWatcher {
    rx: watch::Receiver<MountState>,
}

impl MountWatcher {
    /// Resolves once the mount points exist.
    pub async fn ready(&mut self) -> Result<MountPoints, ViewerError> {
        let state = self
            .rx
            .wait_for(|state| state.current.is_some())
            .await
            .map_err(|_| ViewerError::SurfaceClosed)?;
        state.current.clone().ok_or(ViewerError::SurfaceClosed)
    }

    /// Like [`MountWatcher::ready`], giving up after `limit`.
    pub async fn ready_within(&mut self, limit: Duration) -> Result<MountPoints, ViewerError> {
        match tokio::time::timeout(limit, self.ready()).await {
            Ok(result) => result,
            Err(_) => Err(ViewerError::MountTimeout {
                waited_ms: limit.as_millis() as u64,
            }),
        }
    }

    /// Mount points right now, without waiting.
    pub fn current(&self) -> Option<MountPoints> {
        self.rx.borrow().current.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{MountPoint, MountSignal};
    use crate::ViewerError;

    fn points(signal: &MountSignal) {
        signal.publish(
            MountPoint("original".to_string()),
            MountPoint("modified".to_string()),
        );
    }

    #[tokio::test]
    async fn ready_resolves_after_publish() {
        let signal = MountSignal::new();
        let mut watcher = signal.subscribe();

        let (mounts, ()) = tokio::join!(watcher.ready(), async {
            tokio::task::yield_now().await;
            points(&signal);
        });
        let mounts = mounts.unwrap();
        assert_eq!(mounts.original, MountPoint("original".to_string()));
        assert_eq!(mounts.generation, 1);
    }

    #[test]
    fn republish_keeps_generation_and_relayout_bumps_it() {
        let signal = MountSignal::new();
        points(&signal);
        points(&signal);
        assert_eq!(signal.current().unwrap().generation, 1);

        signal.withdraw();
        assert!(signal.current().is_none());
        points(&signal);
        assert_eq!(signal.current().unwrap().generation, 2);
    }

    #[tokio::test]
    async fn ready_within_times_out_without_layout() {
        let signal = MountSignal::new();
        let mut watcher = signal.subscribe();
        let err = watcher
            .ready_within(Duration::from_millis(10))
            .await
            .unwrap_err();
        assert_eq!(err, ViewerError::MountTimeout { waited_ms: 10 });
    }

    #[tokio::test]
    async fn dropped_surface_is_reported() {
        let signal = MountSignal::new();
        let mut watcher = signal.subscribe();
        drop(signal);
        assert_eq!(watcher.ready().await.unwrap_err(), ViewerError::SurfaceClosed);
    }
}
