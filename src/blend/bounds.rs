use crate::{
    foundation::core::CanvasRect,
    foundation::error::{BlendError, BlendResult},
};

/// Smallest rectangle covering every input rectangle.
///
/// Errors only when `rects` is empty, or when the union is too large to describe.
pub fn canvas_bounds(rects: impl IntoIterator<Item = CanvasRect>) -> BlendResult<CanvasRect> {
    let mut it = rects.into_iter();
    let first = it
        .next()
        .ok_or_else(|| BlendError::validation("nothing to composite: no layers supplied"))?;

    let (mut x0, mut y0) = (first.x, first.y);
    let (mut x1, mut y1) = (first.right(), first.bottom());
    for r in it {
        x0 = x0.min(r.x);
        y0 = y0.min(r.y);
        x1 = x1.max(r.right());
        y1 = y1.max(r.bottom());
    }

    let span = |lo: i64, hi: i64, axis: &str| -> BlendResult<u32> {
        hi.checked_sub(lo)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| BlendError::validation(format!("canvas {axis} exceeds u32 range")))
    };

    Ok(CanvasRect::new(
        x0,
        y0,
        span(x0, x1, "width")?,
        span(y0, y1, "height")?,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/blend/bounds.rs"]
mod tests;
