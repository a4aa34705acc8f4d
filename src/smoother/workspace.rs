//! Buffers owned by a prepared smoother.
//!
//! `image` is read by every sweep while `dest`/`sum` accumulate; the two image
//! buffers are swapped once a pass is finalised, so a sweep never reads what
//! it writes.
use crate::image::{Mask, PixelBuffer};
use crate::tensor::{diffusion_tensor, flow_tensor, structure_tensor, DiffusionLimiter, TensorField};

/// Where the diffusion tensors of a pass come from.
pub(crate) enum TensorSource {
    /// Structure tensor of the current image, recomputed every pass.
    Image { sigma: f32 },
    /// Structure tensor computed once during preparation.
    Fixed,
    /// Caller-supplied vector field at working resolution.
    Flow(PixelBuffer),
}

pub(crate) struct Workspace {
    pub image: PixelBuffer,
    pub dest: PixelBuffer,
    pub sum: PixelBuffer,
    /// Projected direction field `W`, reused across angles.
    pub field: PixelBuffer,
    pub structure: TensorField,
    pub diffusion: TensorField,
    /// Pixels integrated by the sweeps; `None` means all of them.
    pub active: Option<Mask>,
    pub source: TensorSource,
}

impl Workspace {
    pub fn new(image: PixelBuffer, source: TensorSource) -> Self {
        let (w, h) = (image.w, image.h);
        Self {
            dest: image.zeros_like(),
            sum: PixelBuffer::new(w, h, 1),
            field: PixelBuffer::new(w, h, 2),
            structure: TensorField::new(w, h),
            diffusion: TensorField::new(w, h),
            active: None,
            image,
            source,
        }
    }

    pub fn active_pixels(&self) -> usize {
        self.active
            .as_ref()
            .map_or(self.image.pixel_count(), Mask::count)
    }

    /// Rebuild the diffusion tensors for the next pass. Returns the number of
    /// degenerate tensors replaced.
    pub fn update_tensors(&mut self, limiter: DiffusionLimiter) -> usize {
        match &self.source {
            TensorSource::Image { sigma } => {
                self.structure = structure_tensor(&self.image, *sigma, None);
                diffusion_tensor(&self.structure, limiter, &mut self.diffusion)
            }
            TensorSource::Fixed => diffusion_tensor(&self.structure, limiter, &mut self.diffusion),
            TensorSource::Flow(flow) => flow_tensor(flow, &mut self.diffusion),
        }
    }

    pub fn clear_accumulators(&mut self) {
        self.dest.fill(0.0);
        self.sum.fill(0.0);
    }

    /// `dest /= sum` where some weight arrived, otherwise copy the current
    /// image pixel. Returns the number of copied pixels.
    pub fn finalize(&mut self) -> usize {
        let ch = self.image.channels;
        if ch == 0 {
            return 0;
        }
        let mut fallback = 0usize;
        let pixels = self
            .dest
            .data
            .chunks_exact_mut(ch)
            .zip(&self.sum.data)
            .zip(self.image.data.chunks_exact(ch));
        for ((dst, &weight), src) in pixels {
            if weight > 0.0 {
                for v in dst.iter_mut() {
                    *v /= weight;
                }
            } else {
                dst.copy_from_slice(src);
                fallback += 1;
            }
        }
        fallback
    }

    /// Make the finalised `dest` the image of the next pass.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.image, &mut self.dest);
    }
}
