use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};

use super::cache::CachedText;
use super::placement::TextPlacement;

/// GPU record for one text quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TextQuadInstance {
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub uv_origin: [f32; 2],
    pub uv_extent: [f32; 2],
    pub rotation: f32,
}

impl TextQuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // size
        3 => Float32x2, // uv origin
        4 => Float32x2, // uv extent
        5 => Float32    // rotation
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextQuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// A queued text draw referencing its cache entry.
#[derive(Debug)]
pub struct TextInstance<T> {
    pub entry: Rc<CachedText<T>>,
    pub placement: TextPlacement,
    pub uv_origin: [f32; 2],
    pub uv_extent: [f32; 2],
}

impl<T> TextInstance<T> {
    /// Full-texture instance at `placement`.
    pub fn new(entry: Rc<CachedText<T>>, placement: TextPlacement) -> Self {
        Self {
            entry,
            placement,
            uv_origin: [0.0, 0.0],
            uv_extent: [1.0, 1.0],
        }
    }

    fn quad(&self) -> TextQuadInstance {
        TextQuadInstance {
            center: self.placement.center,
            size: self.placement.size,
            uv_origin: self.uv_origin,
            uv_extent: self.uv_extent,
            rotation: self.placement.rotation,
        }
    }
}

/// One texture's share of the serialized quads.
#[derive(Debug)]
pub struct TextGroup<'a, T> {
    pub entry: &'a Rc<CachedText<T>>,
    pub instances: Range<u32>,
}

/// Quads ordered by texture, plus the instance range each texture draws.
#[derive(Debug)]
pub struct GroupedText<'a, T> {
    pub quads: Vec<TextQuadInstance>,
    pub groups: Vec<TextGroup<'a, T>>,
}

/// Pending text instances for one frame.
#[derive(Debug)]
pub struct TextBatch<T> {
    instances: Vec<TextInstance<T>>,
}

impl<T> Default for TextBatch<T> {
    fn default() -> Self {
        Self { instances: Vec::new() }
    }
}

impl<T> TextBatch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instance: TextInstance<T>) {
        self.instances.push(instance);
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[TextInstance<T>] {
        &self.instances
    }

    /// Groups instances by cache entry in order of first appearance.
    ///
    /// Every group's quads are contiguous in `quads`, so one upload covers
    /// all groups and each group draws its own instance range.
    pub fn grouped(&self) -> GroupedText<'_, T> {
        let mut order: Vec<&Rc<CachedText<T>>> = Vec::new();
        let mut members: Vec<Vec<TextQuadInstance>> = Vec::new();
        let mut slot: HashMap<u64, usize> = HashMap::new();

        for inst in &self.instances {
            let i = *slot.entry(inst.entry.id()).or_insert_with(|| {
                order.push(&inst.entry);
                members.push(Vec::new());
                order.len() - 1
            });
            members[i].push(inst.quad());
        }

        let mut quads = Vec::with_capacity(self.instances.len());
        let mut groups = Vec::with_capacity(order.len());
        for (entry, group) in order.into_iter().zip(members) {
            let start = quads.len() as u32;
            quads.extend(group);
            groups.push(TextGroup {
                entry,
                instances: start..quads.len() as u32,
            });
        }

        GroupedText { quads, groups }
    }
}
