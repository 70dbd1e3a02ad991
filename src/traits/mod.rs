pub mod loader;
pub mod renderer;

pub use loader::SceneLoader;
pub use renderer::RenderBackend;
