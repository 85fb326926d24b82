use std::sync::Arc;

use crate::registry::AnimationKey;

/// Identity of one recording run. Ids increase monotonically per pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Video container produced by a capture collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// VP9 in WebM.
    #[default]
    Webm,
    /// H.264 in fragmented MP4.
    Mp4,
}

impl Container {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Container::Webm => "webm",
            Container::Mp4 => "mp4",
        }
    }

    /// MIME type of the finished artifact.
    pub fn mime(self) -> &'static str {
        match self {
            Container::Webm => "video/webm",
            Container::Mp4 => "video/mp4",
        }
    }
}

/// Message emitted by a live capture on the chunk channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkEvent {
    /// Session that produced the event.
    pub session: SessionId,
    /// Event body.
    pub payload: ChunkPayload,
}

/// Body of a [`ChunkEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkPayload {
    /// One encoded fragment, in emission order.
    Data(Vec<u8>),
    /// The session's stream is complete; nothing follows.
    Closed,
}

impl ChunkEvent {
    /// Data fragment of `session`.
    pub fn data(session: SessionId, bytes: Vec<u8>) -> Self {
        Self {
            session,
            payload: ChunkPayload::Data(bytes),
        }
    }

    /// End-of-stream marker of `session`.
    pub fn closed(session: SessionId) -> Self {
        Self {
            session,
            payload: ChunkPayload::Closed,
        }
    }
}

/// Sending half of the chunk channel handed to capture collaborators.
pub type ChunkSender = tokio::sync::mpsc::UnboundedSender<ChunkEvent>;

/// Receiving half of the chunk channel, owned by the pipeline.
pub type ChunkReceiver = tokio::sync::mpsc::UnboundedReceiver<ChunkEvent>;

/// Chunks of one animation run, append-only until finalized.
#[derive(Debug)]
pub struct RecordingSession {
    id: SessionId,
    key: AnimationKey,
    chunks: Vec<Vec<u8>>,
}

impl RecordingSession {
    /// Empty session for `key`.
    pub fn new(id: SessionId, key: AnimationKey) -> Self {
        Self {
            id,
            key,
            chunks: Vec::new(),
        }
    }

    /// Session identity.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Topic being recorded.
    pub fn key(&self) -> &AnimationKey {
        &self.key
    }

    /// Append one fragment.
    pub fn push(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }

    /// Number of fragments received so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total bytes received so far.
    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Concatenate the fragments into an immutable artifact.
    pub fn into_artifact(self, container: Container) -> Artifact {
        let mut data = Vec::with_capacity(self.byte_len());
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }
        Artifact {
            session: self.id,
            filename: artifact_filename(&self.key, container),
            mime: container.mime(),
            data: Arc::from(data),
        }
    }
}

/// Suggested download name: `<key>-animation.<ext>`.
pub fn artifact_filename(key: &AnimationKey, container: Container) -> String {
    format!("{}-animation.{}", key.as_str(), container.extension())
}

/// Finalized recording, cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Session the artifact came from.
    pub session: SessionId,
    /// Suggested file name.
    pub filename: String,
    /// MIME type.
    pub mime: &'static str,
    /// Encoded video bytes.
    pub data: Arc<[u8]>,
}

impl Artifact {
    /// An artifact without data: the capture emitted nothing. Still downloadable.
    pub fn is_degenerate(&self) -> bool {
        self.data.is_empty()
    }

    /// Handle under which the artifact can be resolved, e.g. by a download trigger.
    pub fn handle(&self) -> String {
        format!("artifact:{}/{}", self.session.0, self.filename)
    }
}
