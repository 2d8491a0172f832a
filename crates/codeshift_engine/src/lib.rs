//! Codeshift engine: stream decoding, upload transport, viewer lifecycle and session driving.
mod decode;
mod mount;
mod session;
mod types;
mod upload;
mod viewer;

pub use decode::{decode_records, NdjsonDecoder, RecordStream};
pub use mount::{MountPoint, MountPoints, MountSignal, MountWatcher};
pub use session::{ConversionController, RenderSink};
pub use types::{TransportError, TransportFailureKind, ViewerError};
pub use upload::{
    download_url, ByteStream, ResponseBody, ReqwestUploader, UploadSettings, Uploader,
};
pub use viewer::{
    CodeViewer, LanguageHint, ShowOutcome, ViewerConfig, ViewerController, ViewerFactory,
    ViewerLanguages,
};
