use std::env;
use std::path::PathBuf;

/// Hard ceiling for a single provider upload. Whisper rejects payloads over
/// 25 MB; 24 MiB keeps a safety margin under that cap.
pub const PROVIDER_PAYLOAD_CEILING_BYTES: u64 = 24 * 1024 * 1024;

/// Default size a chunk is planned against when a file must be split.
pub const DEFAULT_MAX_CHUNK_BYTES: u64 = 20 * 1024 * 1024;

const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";
const DEFAULT_FFPROBE_BIN: &str = "ffprobe";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub upload_dir: PathBuf,
    pub max_chunk_bytes: u64,
    pub ffmpeg_bin: PathBuf,
    pub ffprobe_bin: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            ffmpeg_bin: PathBuf::from(DEFAULT_FFMPEG_BIN),
            ffprobe_bin: PathBuf::from(DEFAULT_FFPROBE_BIN),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment (`.env` honored when present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let upload_dir = env::var("UPLOAD_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let max_chunk_bytes = env::var("MAX_CHUNK_BYTES")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_CHUNK_BYTES);
        let max_chunk_bytes = normalize_chunk_size(max_chunk_bytes);

        let ffmpeg_bin = env::var("FFMPEG_BIN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FFMPEG_BIN));

        let ffprobe_bin = env::var("FFPROBE_BIN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FFPROBE_BIN));

        tracing::info!(
            "Config loaded: upload_dir={}, max_chunk_bytes={}, api_key={}",
            upload_dir.display(),
            max_chunk_bytes,
            openai_api_key.is_some()
        );

        Self {
            openai_api_key,
            upload_dir,
            max_chunk_bytes,
            ffmpeg_bin,
            ffprobe_bin,
        }
    }
}

/// Clamp a configured chunk size to the provider payload ceiling.
pub fn normalize_chunk_size(requested: u64) -> u64 {
    if requested > PROVIDER_PAYLOAD_CEILING_BYTES {
        tracing::warn!(
            "MAX_CHUNK_BYTES {} exceeds provider ceiling {}, clamping",
            requested,
            PROVIDER_PAYLOAD_CEILING_BYTES
        );
        PROVIDER_PAYLOAD_CEILING_BYTES
    } else {
        requested
    }
}
