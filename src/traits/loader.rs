use crate::error::DecodeError;
use crate::scene::SceneGraph;

/// Scene decode capability: raw model payload bytes to a renderable graph.
pub trait SceneLoader {
    /// Decode a payload. Failure reports the underlying loader message and
    /// leaves the caller's scene untouched.
    fn decode(&self, payload: &[u8]) -> Result<SceneGraph, DecodeError>;
}
