//! Render sink boundary.
//!
//! The simulation step fills one [`FrameBuffers`] per frame: a group
//! transform plus, per category bucket, one [`InstanceRaw`] (4x4 transform
//! and RGB colour) per particle. Buffers are sized once at startup and
//! overwritten in place every frame.
//!
//! The sink does everything after that (camera, lighting, bloom). It only
//! ever sees fully written frames.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::gesture::GestureState;
use crate::particle::Category;

/// GPU-ready instance record.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix.
    pub transform: [[f32; 4]; 4],
    pub color: [f32; 3],
    _padding: f32,
}

impl InstanceRaw {
    pub fn new(transform: Mat4, color: Vec3) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            color: color.to_array(),
            _padding: 0.0,
        }
    }

    /// Translation column of the transform.
    pub fn translation(&self) -> Vec3 {
        let t = self.transform[3];
        Vec3::new(t[0], t[1], t[2])
    }
}

/// One frame of render input.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    /// Transform applied to the whole swarm (spin and wobble).
    pub group_transform: Mat4,
    /// Gesture the frame was simulated under.
    pub gesture: GestureState,
    /// Seconds since the session started.
    pub time: f32,
    buckets: [Vec<InstanceRaw>; 2],
}

impl FrameBuffers {
    /// Allocate buckets for `round` and `angular` instances.
    pub fn with_capacity(round: usize, angular: usize) -> Self {
        Self {
            group_transform: Mat4::IDENTITY,
            gesture: GestureState::None,
            time: 0.0,
            buckets: [
                vec![InstanceRaw::zeroed(); round],
                vec![InstanceRaw::zeroed(); angular],
            ],
        }
    }

    /// Instances of one category, in write order.
    #[inline]
    pub fn bucket(&self, category: Category) -> &[InstanceRaw] {
        &self.buckets[category.bucket()]
    }

    /// Raw bytes of one bucket, ready for upload.
    pub fn bucket_bytes(&self, category: Category) -> &[u8] {
        bytemuck::cast_slice(self.bucket(category))
    }

    /// Overwrite slot `index` of a bucket. Out-of-range writes are dropped.
    #[inline]
    pub(crate) fn write(&mut self, category: Category, index: usize, instance: InstanceRaw) {
        if let Some(slot) = self.buckets[category.bucket()].get_mut(index) {
            *slot = instance;
        }
    }

    /// Total instances across both buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Consumer of finished frames.
pub trait RenderSink {
    fn submit(&mut self, frame: &FrameBuffers);
}

impl<F: FnMut(&FrameBuffers)> RenderSink for F {
    fn submit(&mut self, frame: &FrameBuffers) {
        self(frame)
    }
}

/// Sink that discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn submit(&mut self, _frame: &FrameBuffers) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
    }

    #[test]
    fn test_instance_translation() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let raw = InstanceRaw::new(m, Vec3::ONE);
        assert_eq!(raw.translation(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_out_of_range_write_ignored() {
        let mut frame = FrameBuffers::with_capacity(1, 0);
        frame.write(Category::Angular, 0, InstanceRaw::new(Mat4::IDENTITY, Vec3::ONE));
        frame.write(Category::Round, 5, InstanceRaw::new(Mat4::IDENTITY, Vec3::ONE));
        assert_eq!(frame.bucket(Category::Round)[0], InstanceRaw::zeroed());
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_bucket_bytes() {
        let frame = FrameBuffers::with_capacity(3, 2);
        assert_eq!(frame.bucket_bytes(Category::Round).len(), 3 * 80);
        assert_eq!(frame.bucket_bytes(Category::Angular).len(), 2 * 80);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = 0;
        {
            let mut sink = |frame: &FrameBuffers| seen += frame.len();
            sink.submit(&FrameBuffers::with_capacity(2, 3));
        }
        assert_eq!(seen, 5);
    }
}
