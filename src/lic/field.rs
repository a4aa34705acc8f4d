use crate::angle::SweepAngle;
use crate::image::PixelBuffer;
use crate::tensor::TensorField;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Project every tensor onto the sweep direction: `W(x, y) = D(x, y) · (cos θ, sin θ)`.
///
/// `out` is reused across angles; it is reallocated only when its geometry
/// differs from the tensor field.
pub fn project_field(tensors: &TensorField, angle: SweepAngle, out: &mut PixelBuffer) {
    let (w, h) = (tensors.w(), tensors.h());
    if out.w != w || out.h != h || out.channels != 2 {
        *out = PixelBuffer::new(w, h, 2);
    }
    if out.is_empty() {
        return;
    }
    let dir = angle.direction();
    let project_row = |y: usize, row: &mut [f32]| {
        for (x, px) in row.chunks_exact_mut(2).enumerate() {
            let v = tensors.get(x, y).apply(dir);
            px[0] = v[0];
            px[1] = v[1];
        }
    };

    #[cfg(feature = "parallel")]
    out.data
        .par_chunks_mut(w * 2)
        .enumerate()
        .for_each(|(y, row)| project_row(y, row));

    #[cfg(not(feature = "parallel"))]
    out.data
        .chunks_mut(w * 2)
        .enumerate()
        .for_each(|(y, row)| project_row(y, row));
}
