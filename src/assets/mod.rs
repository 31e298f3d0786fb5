pub mod loaders;
pub mod parser;

pub use loaders::GltfAsset;
pub use parser::{AnimationParser, ParsedAnimation};
