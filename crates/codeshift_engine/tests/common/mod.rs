#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use bytes::Bytes;
use codeshift_core::{AppState, AppViewModel, ViewerSlot};
use codeshift_engine::{
    CodeViewer, ConversionController, MountPoint, MountSignal, RenderSink, ResponseBody,
    TransportError, Uploader, ViewerConfig, ViewerController, ViewerError, ViewerFactory,
    ViewerLanguages,
};
use futures_util::stream;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shift_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        slot: ViewerSlot,
        mount: String,
        text: String,
        language: String,
        read_only: bool,
    },
    SetText {
        slot: ViewerSlot,
        text: String,
    },
    Dispose {
        slot: ViewerSlot,
    },
}

/// Shared log of widget calls plus switches to make the widget misbehave.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_create: Arc<AtomicBool>,
    fail_update: Arc<AtomicBool>,
    fail_dispose: Arc<AtomicBool>,
    refuse_slot: Arc<Mutex<Option<ViewerSlot>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<Call> {
        self.calls.lock().unwrap().drain(..).collect()
    }

    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Create { .. }))
            .count()
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_dispose(&self, fail: bool) {
        self.fail_dispose.store(fail, Ordering::SeqCst);
    }

    /// Makes creation fail for `slot` only; the other slot still succeeds.
    pub fn refuse_create_for(&self, slot: Option<ViewerSlot>) {
        *self.refuse_slot.lock().unwrap() = slot;
    }

    fn refuses(&self, slot: ViewerSlot) -> bool {
        self.fail_create.load(Ordering::SeqCst) || *self.refuse_slot.lock().unwrap() == Some(slot)
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub struct FakeFactory {
    recorder: Recorder,
}

impl FakeFactory {
    pub fn new(recorder: &Recorder) -> Arc<Self> {
        Arc::new(Self {
            recorder: recorder.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ViewerFactory for FakeFactory {
    async fn create(
        &self,
        slot: ViewerSlot,
        mount: &MountPoint,
        config: ViewerConfig,
    ) -> Result<Box<dyn CodeViewer>, ViewerError> {
        if self.recorder.refuses(slot) {
            return Err(ViewerError::Create {
                slot,
                message: "widget refused".to_string(),
            });
        }
        self.recorder.push(Call::Create {
            slot,
            mount: mount.0.clone(),
            text: config.text,
            language: config.language.id,
            read_only: config.read_only,
        });
        Ok(Box::new(FakeViewer {
            slot,
            recorder: self.recorder.clone(),
        }))
    }
}

struct FakeViewer {
    slot: ViewerSlot,
    recorder: Recorder,
}

#[async_trait::async_trait]
impl CodeViewer for FakeViewer {
    async fn set_text(&mut self, text: &str) -> Result<(), ViewerError> {
        if self.recorder.fail_update.load(Ordering::SeqCst) {
            return Err(ViewerError::Update {
                slot: self.slot,
                message: "widget torn down".to_string(),
            });
        }
        self.recorder.push(Call::SetText {
            slot: self.slot,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn dispose(&mut self) -> Result<(), ViewerError> {
        self.recorder.push(Call::Dispose { slot: self.slot });
        if self.recorder.fail_dispose.load(Ordering::SeqCst) {
            return Err(ViewerError::Dispose {
                slot: self.slot,
                message: "already gone".to_string(),
            });
        }
        Ok(())
    }
}

/// A base URL nothing listens on: bind an ephemeral port, then release it.
pub fn unbound_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn publish(signal: &MountSignal) {
    signal.publish(
        MountPoint("original-container".to_string()),
        MountPoint("modified-container".to_string()),
    );
}

/// Render sink that lays out the editor area the way a real surface would.
pub struct LayoutRenderer {
    signal: MountSignal,
    views: Arc<Mutex<Vec<AppViewModel>>>,
}

impl RenderSink for LayoutRenderer {
    fn render(&mut self, view: &AppViewModel) {
        if view.has_editor_area() {
            publish(&self.signal);
        } else {
            self.signal.withdraw();
        }
        self.views.lock().unwrap().push(view.clone());
    }
}

pub struct Harness {
    pub controller: ConversionController,
    pub recorder: Recorder,
    pub views: Arc<Mutex<Vec<AppViewModel>>>,
}

pub fn harness(state: AppState, uploader: Arc<dyn Uploader>) -> Harness {
    let recorder = Recorder::default();
    let signal = MountSignal::new();
    let viewers = ViewerController::new(
        FakeFactory::new(&recorder),
        signal.subscribe(),
        ViewerLanguages::default(),
        Duration::from_millis(200),
    );
    let views = Arc::new(Mutex::new(Vec::new()));
    let renderer = LayoutRenderer {
        signal,
        views: views.clone(),
    };
    Harness {
        controller: ConversionController::new(state, uploader, viewers, Box::new(renderer)),
        recorder,
        views,
    }
}

/// Replays a fixed body, chunk by chunk.
pub struct ScriptedUploader {
    chunks: Vec<Result<&'static [u8], TransportError>>,
    open_error: Option<TransportError>,
}

impl ScriptedUploader {
    pub fn chunks(chunks: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            chunks: chunks.iter().map(|chunk| Ok(chunk.as_bytes())).collect(),
            open_error: None,
        })
    }

    pub fn items(chunks: Vec<Result<&'static [u8], TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            open_error: None,
        })
    }

    pub fn refusing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            open_error: Some(error),
        })
    }
}

#[async_trait::async_trait]
impl Uploader for ScriptedUploader {
    async fn open_stream(&self, _archive: &Path) -> Result<ResponseBody, TransportError> {
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }
        let items: Vec<_> = self
            .chunks
            .iter()
            .cloned()
            .map(|item| item.map(Bytes::from_static))
            .collect();
        Ok(ResponseBody {
            content_type: Some("application/x-ndjson".to_string()),
            chunks: Box::pin(stream::iter(items)),
        })
    }
}
