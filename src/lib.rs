pub mod assets;
pub mod chunk;
pub mod config;
pub mod error;
pub mod jobs;
pub mod media;
pub mod providers;
pub mod storage;
pub mod store;

pub use assets::AssetCatalog;
pub use config::AppConfig;
pub use error::PipelineError;
pub use jobs::{JobLauncher, LaunchAck, SummaryOrchestrator, TranscriptionOrchestrator};
pub use media::{FfmpegTool, MediaTool};
pub use providers::{SummarizationProvider, TranscriptionProvider};
pub use storage::{BlobStore, LocalBlobStorage};
pub use store::{AssetUpdate, InMemoryRecordStore, MediaAsset, RecordStore, Stage, TextBlob};
