mod scene;

pub use scene::SceneRenderer;
