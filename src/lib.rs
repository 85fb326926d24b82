//! Mathviz renders short procedural math-concept animations and records them to video.
//!
//! A topic query is normalized into an [`AnimationKey`], explained through a
//! [`TextLookup`], and resolved by the [`Registry`] into an [`Animation`]. The
//! [`Studio`] then drives that animation one frame at a time, rasterizes each
//! frame on the CPU and streams it into a [`CapturePipeline`], which turns the
//! ordered chunks of the run into a downloadable [`Artifact`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod capture;
pub(crate) mod config;
pub(crate) mod lookup;
pub(crate) mod registry;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod scheduler;
pub(crate) mod studio;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameRGBA, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{MathvizError, MathvizResult};

pub use crate::animation::Animation;
pub use crate::animation::clock::Clock;
pub use crate::animation::reveal::{Gate, Layer, Reveal, Scene};
pub use crate::capture::{CaptureHandle, SurfaceCapture};
pub use crate::capture::download::{DirectoryDownloader, Downloader};
pub use crate::capture::ffmpeg::{CaptureConfig, FfmpegCapture, is_ffmpeg_on_path};
pub use crate::capture::pipeline::CapturePipeline;
pub use crate::capture::session::{
    Artifact, ChunkEvent, ChunkPayload, ChunkSender, Container, RecordingSession, SessionId,
};
pub use crate::config::{FontConfig, PacingMode, StudioConfig};
pub use crate::lookup::{CatalogLookup, Explanation, LookupError, TextLookup};
pub use crate::registry::{AnimationKey, Registry, TopicKind};
pub use crate::render::cpu::CpuRasterizer;
pub use crate::render::png::save_png;
pub use crate::render::text::{FontBook, FontFace};
pub use crate::scene::surface::{DrawOp, FontSpec, FontWeight, StrokeStyle, Surface};
pub use crate::scheduler::{Advance, FramePacing, FrameScheduler};
pub use crate::studio::{CreateError, Created, StepOutcome, Studio, StudioState};
