pub mod ffmpeg;
pub mod frame_codec;
pub mod pipeline;

pub use ffmpeg::{Ffmpeg, VideoError};
pub use frame_codec::{CodecError, FrameBuffer};
pub use pipeline::{PipelineError, VideoPipeline};
