pub mod gltf;

pub use gltf::GltfAsset;
