pub const DEFAULT_VIDEO_MIME_TYPE: &str = "video/mp4";
pub const DEFAULT_AUDIO_MIME_TYPE: &str = "audio/wav";

/// Scheme prefix of every URL handed out by the blob registry.
pub const OBJECT_URL_PREFIX: &str = "blob:media-recorder/";
