use std::fs;
use std::path::Path;

use base64::Engine;
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::{
    AnimationClip, ClipTiming, InterpolationMode, KeyframeTrack, MorphCurves, TargetPath, Track, TrackData,
    TrackMeta,
};
use crate::assets::parser::{AnimationParser, ParsedAnimation};
use crate::config::SkeletalAnimationConfig;
use crate::errors::{Result, RetargetError};
use crate::skeleton::{BoneDef, SkeletonHierarchy, Transform};

// ============================================================================
// Asset
// ============================================================================

/// A parsed glTF document with its buffers resolved.
pub struct GltfAsset {
    document: gltf::Document,
    buffers: Vec<Vec<u8>>,
}

impl GltfAsset {
    /// Opens a `.gltf` or `.glb` file; external buffers resolve next to it.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let base_path = path.parent().unwrap_or(Path::new("./"));
        let asset = Self::from_slice(&bytes, Some(base_path))?;
        log::info!(
            "Loaded glTF {}: {} skins, {} animations",
            path.display(),
            asset.document.skins().count(),
            asset.document.animations().count()
        );
        Ok(asset)
    }

    /// Parses glTF JSON or GLB bytes.
    ///
    /// Without `base_path` only GLB and `data:` URI buffers can be resolved.
    pub fn from_slice(bytes: &[u8], base_path: Option<&Path>) -> Result<Self> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(bytes)?;
        let buffers = Self::load_buffers(&document, blob.as_deref(), base_path)?;
        Ok(Self { document, buffers })
    }

    fn load_buffers(
        document: &gltf::Document,
        blob: Option<&[u8]>,
        base_path: Option<&Path>,
    ) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in document.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => blob
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| RetargetError::GltfError("Missing GLB binary chunk".to_string()))?,
                gltf::buffer::Source::Uri(uri) => match decode_data_uri(uri)? {
                    Some(data) => data,
                    None => {
                        let Some(base_path) = base_path else {
                            return Err(RetargetError::GltfError(format!(
                                "External buffer {uri} cannot be resolved without a base path"
                            )));
                        };
                        fs::read(base_path.join(uri))?
                    }
                },
            };
            if data.len() < buffer.length() {
                return Err(RetargetError::GltfError(format!(
                    "Buffer {} holds {} bytes, {} declared",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                )));
            }
            buffer_data.push(data);
        }
        Ok(buffer_data)
    }

    #[must_use]
    pub fn animation_names(&self) -> Vec<String> {
        self.document
            .animations()
            .filter_map(|anim| anim.name().map(str::to_string))
            .collect()
    }

    #[must_use]
    pub fn skin_names(&self) -> Vec<String> {
        self.document
            .skins()
            .map(|skin| skin_name(&skin))
            .collect()
    }

    // ========================================================================
    // Skeletons
    // ========================================================================

    /// Skeleton of the skin called `name`.
    pub fn skeleton(&self, name: &str) -> Result<SkeletonHierarchy> {
        let Some(skin) = self.document.skins().find(|skin| skin_name(skin) == name) else {
            log::warn!("Skin {name} not found");
            return Err(RetargetError::MissingInput("skin"));
        };
        self.skeleton_from_skin(&skin)
    }

    pub fn skeleton_by_index(&self, index: usize) -> Result<SkeletonHierarchy> {
        let Some(skin) = self.document.skins().nth(index) else {
            return Err(RetargetError::MissingInput("skin"));
        };
        self.skeleton_from_skin(&skin)
    }

    /// Builds a hierarchy from a skin's joints.
    ///
    /// Joints are reordered depth-first so parents precede children. A joint's
    /// parent is its nearest ancestor node that is also a joint.
    fn skeleton_from_skin(&self, skin: &gltf::Skin<'_>) -> Result<SkeletonHierarchy> {
        let joints: Vec<gltf::Node<'_>> = skin.joints().collect();
        if joints.is_empty() {
            return Err(RetargetError::MissingInput("skin joints"));
        }

        let joint_slots: FxHashMap<usize, usize> = joints
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.index(), slot))
            .collect();

        let mut node_parents: FxHashMap<usize, usize> = FxHashMap::default();
        for node in self.document.nodes() {
            for child in node.children() {
                node_parents.insert(child.index(), node.index());
            }
        }

        let node_count = self.document.nodes().count();
        let joint_parents: Vec<Option<usize>> = joints
            .iter()
            .map(|joint| {
                let mut current = joint.index();
                for _ in 0..node_count {
                    let parent = *node_parents.get(&current)?;
                    if let Some(&slot) = joint_slots.get(&parent) {
                        return Some(slot);
                    }
                    current = parent;
                }
                None
            })
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); joints.len()];
        let mut stack = Vec::new();
        for (slot, parent) in joint_parents.iter().enumerate().rev() {
            match parent {
                Some(parent) => children[*parent].insert(0, slot),
                None => stack.push(slot),
            }
        }

        let mut order = Vec::with_capacity(joints.len());
        while let Some(slot) = stack.pop() {
            order.push(slot);
            stack.extend(children[slot].iter().rev());
        }
        if order.len() != joints.len() {
            return Err(RetargetError::GltfError(format!(
                "Skin {} has a cyclic joint hierarchy",
                skin_name(skin)
            )));
        }

        let mut bone_index = vec![0; joints.len()];
        for (index, &slot) in order.iter().enumerate() {
            bone_index[slot] = index;
        }

        let bones = order
            .iter()
            .map(|&slot| {
                let node = &joints[slot];
                let (t, r, s) = node.transform().decomposed();
                BoneDef::new(
                    node_name(node),
                    joint_parents[slot].map(|parent| bone_index[parent]),
                    Transform::new(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s)),
                )
            })
            .collect();

        SkeletonHierarchy::new(&skin_name(skin), bones)
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Keyframe clip and morph curves of the animation called `name`.
    pub fn load_animation_clip(&self, name: &str, case_sensitive: bool) -> Result<(AnimationClip, MorphCurves)> {
        let Some(anim) = self.document.animations().find(|anim| {
            anim.name().is_some_and(|anim_name| {
                if case_sensitive {
                    anim_name == name
                } else {
                    anim_name.to_lowercase() == name.to_lowercase()
                }
            })
        }) else {
            return Err(RetargetError::AnimationNotFound(name.to_string()));
        };

        let mut tracks = Vec::new();
        let mut morph_curves = MorphCurves::default();

        for channel in anim.channels() {
            let reader = channel.reader(|buffer| self.buffers.get(buffer.index()).map(Vec::as_slice));
            let gltf_node = channel.target().node();
            let node_name = node_name(&gltf_node);

            let Some(inputs) = reader.read_inputs() else {
                log::warn!("Animation {name}: channel for {node_name} has no keyframe times");
                continue;
            };
            let times: Vec<f32> = inputs.collect();
            if times.iter().any(|t| !t.is_finite() || *t < 0.0) {
                return Err(RetargetError::GltfError(format!(
                    "Animation {name}: channel for {node_name} has a negative or non-finite keyframe time"
                )));
            }

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let Some(outputs) = reader.read_outputs() else {
                log::warn!("Animation {name}: channel for {node_name} has no keyframe values");
                continue;
            };

            let (target, data) = match outputs {
                gltf::animation::util::ReadOutputs::Translations(iter) => (
                    TargetPath::Translation,
                    TrackData::Vector3(KeyframeTrack::new(times, iter.map(Vec3::from_array).collect(), interpolation)),
                ),
                gltf::animation::util::ReadOutputs::Rotations(iter) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        iter.into_f32().map(Quat::from_array).collect(),
                        interpolation,
                    )),
                ),
                gltf::animation::util::ReadOutputs::Scales(iter) => (
                    TargetPath::Scale,
                    TrackData::Vector3(KeyframeTrack::new(times, iter.map(Vec3::from_array).collect(), interpolation)),
                ),
                gltf::animation::util::ReadOutputs::MorphTargetWeights(iter) => {
                    let weights: Vec<f32> = iter.into_f32().collect();
                    let curve_base = gltf_node
                        .mesh()
                        .and_then(|mesh| mesh.name().map(str::to_string))
                        .unwrap_or_else(|| node_name.clone());
                    collect_morph_curves(&mut morph_curves, &curve_base, &times, &weights, interpolation);
                    continue;
                }
            };

            tracks.push(Track {
                meta: TrackMeta { node_name, target },
                data,
            });
        }

        let anim_name = anim.name().unwrap_or(name).to_string();
        let mut clip = AnimationClip::new(anim_name, String::new(), tracks);
        let morph_end = morph_curves
            .values()
            .filter_map(|keys| keys.last().map(|(time, _)| *time))
            .fold(0.0_f32, f32::max);
        clip.duration = clip.duration.max(morph_end);

        log::debug!(
            "Animation {}: {} tracks, {} morph curves, {:.3}s",
            clip.name,
            clip.tracks.len(),
            morph_curves.len(),
            clip.duration
        );
        Ok((clip, morph_curves))
    }
}

impl AnimationParser for GltfAsset {
    fn load_animation_by_name_as_tracks_and_morph_targets(
        &self,
        name: &str,
        config: &SkeletalAnimationConfig,
        case_sensitive: bool,
    ) -> Result<ParsedAnimation> {
        let (clip, morph_curves) = self.load_animation_clip(name, case_sensitive)?;
        let fps = config.sample_rate();
        let timing = ClipTiming::from_duration(clip.duration, fps)?;
        Ok(ParsedAnimation {
            tracks: clip.to_bone_tracks(timing.frame_count, fps),
            morph_curves,
            duration: clip.duration,
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn node_name(node: &gltf::Node<'_>) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

fn skin_name(skin: &gltf::Skin<'_>) -> String {
    skin.name()
        .map_or_else(|| format!("Skeleton_{}", skin.index()), str::to_string)
}

/// Decodes a base64 `data:` URI; `None` if `uri` is not a data URI.
fn decode_data_uri(uri: &str) -> Result<Option<Vec<u8>>> {
    let Some(rest) = uri.strip_prefix("data:") else {
        return Ok(None);
    };
    let Some((_, payload)) = rest.split_once(";base64,") else {
        return Err(RetargetError::DataUriError("only base64 data URIs are supported".to_string()));
    };
    Ok(Some(base64::engine::general_purpose::STANDARD.decode(payload)?))
}

/// Splits flattened morph weights into one `(time, weight)` curve per target.
fn collect_morph_curves(
    curves: &mut MorphCurves,
    base_name: &str,
    times: &[f32],
    weights: &[f32],
    interpolation: InterpolationMode,
) {
    let cubic = interpolation == InterpolationMode::CubicSpline;
    let rows = if cubic { times.len() * 3 } else { times.len() };
    if rows == 0 || weights.len() % rows != 0 {
        log::warn!("Morph weights for {base_name} do not match their {} keyframes", times.len());
        return;
    }
    let targets = weights.len() / rows;

    for target in 0..targets {
        let keys = times
            .iter()
            .enumerate()
            .map(|(key, &time)| {
                let row = if cubic { key * 3 + 1 } else { key };
                (time, weights[row * targets + target])
            })
            .collect();
        curves.insert(format!("{base_name}_{target}"), keys);
    }
}
