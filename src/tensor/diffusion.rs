//! Diffusion tensors from structure tensors.
//!
//! With `l1 <= l2` the structure eigenvalues and `iso`/`grad` the matching
//! eigenvectors, the diffusion tensor is
//!
//! ```text
//! n1 = (1 + l1 + l2)^(-p1/2)      // along the isophote
//! n2 = (1 + l1 + l2)^(-p2/2)      // across it
//! D  = n1 · iso⊗iso + n2 · grad⊗grad
//! ```
//!
//! so flat regions diffuse isotropically and edges diffuse only along
//! themselves. The field is finally divided by its largest absolute
//! component. Pixels whose tensor or weights are not finite are replaced by
//! the isotropic unit tensor and counted.
use super::{Tensor3, TensorField};
use crate::image::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Below this magnitude a flow vector is not renormalised.
const FLOW_NORM_EPS: f32 = 1e-5;

/// Power-law limiter exponents (`p1` isophote, `p2` gradient; `p1 <= p2`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffusionLimiter {
    pub p1: f32,
    pub p2: f32,
}

impl DiffusionLimiter {
    /// Diffusion tensor for one structure tensor, or `None` when the result
    /// would not be finite.
    pub fn diffusion(&self, structure: Tensor3) -> Option<Tensor3> {
        if !structure.is_finite() {
            return None;
        }
        let e = structure.eigen();
        let base = 1.0 + e.l1 + e.l2;
        if !(base.is_finite() && base > 0.0) {
            return None;
        }
        let n1 = base.powf(-0.5 * self.p1);
        let n2 = base.powf(-0.5 * self.p2);
        if !(n1.is_finite() && n2.is_finite()) {
            return None;
        }
        let d = n1 * Tensor3::outer(e.iso) + n2 * Tensor3::outer(e.grad);
        d.is_finite().then_some(d)
    }
}

/// Fill `out` with the normalised diffusion tensors of `structure`.
/// Returns the number of degenerate pixels replaced by the identity.
pub fn diffusion_tensor(
    structure: &TensorField,
    limiter: DiffusionLimiter,
    out: &mut TensorField,
) -> usize {
    out.reset(structure.w(), structure.h());
    let mut degenerate = 0usize;
    for y in 0..structure.h() {
        for x in 0..structure.w() {
            let d = limiter.diffusion(structure.get(x, y)).unwrap_or_else(|| {
                degenerate += 1;
                Tensor3::IDENTITY
            });
            out.set(x, y, d);
        }
    }
    out.normalize_max_abs();
    degenerate
}

/// Fill `out` with tensors aligned with a 2-channel vector field:
/// `w⊗w / |w|^½` (the divisor is 1 for near-zero vectors), then normalise.
/// Non-finite vectors become zero tensors and are counted.
pub fn flow_tensor(flow: &PixelBuffer, out: &mut TensorField) -> usize {
    out.reset(flow.w, flow.h);
    let mut degenerate = 0usize;
    if flow.channels < 2 {
        return degenerate;
    }
    for y in 0..flow.h {
        for x in 0..flow.w {
            let px = flow.pixel(x, y);
            let (u, v) = (px[0], px[1]);
            if !(u.is_finite() && v.is_finite()) {
                degenerate += 1;
                continue;
            }
            let n = (u * u + v * v).powf(0.25);
            let nn = if n < FLOW_NORM_EPS { 1.0 } else { n };
            out.set(x, y, (1.0 / nn) * Tensor3::outer([u, v]));
        }
    }
    out.normalize_max_abs();
    degenerate
}
