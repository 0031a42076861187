pub mod cache;
pub mod function;
pub mod mesh;
pub mod normal;
pub mod presets;
pub mod tessellator;

pub use cache::MeshCache;
pub use function::{ShapeParams, SurfaceError};
pub use mesh::StripMesh;
pub use normal::NormalMode;
pub use presets::SHAPE_PRESETS;
pub use tessellator::TessellationSettings;
