use super::*;

fn internal_axis(crop: u32, fade: u32) -> AxisFalloff {
    // 20px layer at 10..30 on a 0..40 canvas: both edges internal.
    AxisFalloff::new(crop, fade, 10, 20, 0, 40)
}

#[test]
fn crop_band_is_excluded() {
    let a = internal_axis(2, 3);
    assert_eq!(a.factor(0), 0.0);
    assert_eq!(a.factor(1), 0.0);
    assert_eq!(a.factor(19), 0.0);
    assert_eq!(a.factor(18), 0.0);
}

#[test]
fn fade_band_ramps_linearly() {
    let a = internal_axis(2, 3);
    assert_eq!(a.factor(2), 0.25);
    assert_eq!(a.factor(3), 0.5);
    assert_eq!(a.factor(17), 0.25);
    assert_eq!(a.factor(16), 0.5);
    assert_eq!(a.factor(10), 1.0);
}

#[test]
fn last_fade_pixel_is_nearly_full() {
    let (crop, fade) = (2, 9);
    let a = internal_axis(crop, fade);
    let d = crop + fade - 1;
    let f = a.factor(d);
    assert!((f - 0.9).abs() < 1e-12);
    assert!(1.0 - f <= 1.0 / f64::from(fade + 1) + 1e-12);
    assert_eq!(a.factor(d + 1), 1.0);
}

#[test]
fn canvas_border_edges_are_untouched() {
    // Layer flush with both canvas borders.
    let a = AxisFalloff::new(3, 3, 0, 10, 0, 10);
    assert!(a.table().iter().all(|&f| f == 1.0));

    // Only the trailing edge is internal.
    let a = AxisFalloff::new(1, 1, 0, 10, 0, 20);
    assert_eq!(a.factor(0), 1.0);
    assert_eq!(a.factor(9), 0.0);
    assert_eq!(a.factor(8), 0.5);
}

#[test]
fn narrow_layer_takes_more_restrictive_side() {
    // 4px layer with a 3px fade on both internal sides.
    let a = AxisFalloff::new(0, 3, 5, 4, 0, 20);
    assert_eq!(a.table(), vec![0.25, 0.5, 0.5, 0.25]);
}

#[test]
fn zero_params_never_attenuate() {
    let a = internal_axis(0, 0);
    assert!(a.table().iter().all(|&f| f == 1.0));
}

#[test]
fn axes_use_their_own_bands() {
    let params = EdgeParams {
        crop_h: 0,
        crop_v: 0,
        fade_h: 3,
        fade_v: 1,
    };
    let canvas = CanvasRect::new(0, 0, 40, 40);
    let f = EdgeFalloff::new(params, CanvasRect::new(10, 10, 20, 20), canvas);
    // Each axis uses its own fade band.
    assert_eq!(f.horizontal.factor(0), 0.25);
    assert_eq!(f.vertical.factor(0), 0.5);
    assert_eq!(f.horizontal.factor(10).min(f.vertical.factor(10)), 1.0);
}

#[test]
fn vertical_crop_leaves_columns_alone() {
    let params = EdgeParams {
        crop_v: 1,
        ..EdgeParams::default()
    };
    let canvas = CanvasRect::new(0, 0, 10, 10);
    let f = EdgeFalloff::new(params, CanvasRect::new(0, 2, 10, 5), canvas);
    assert_eq!(f.vertical.factor(0), 0.0);
    assert_eq!(f.vertical.factor(4), 0.0);
    assert_eq!(f.vertical.factor(2), 1.0);
    assert!(f.horizontal.table().iter().all(|&x| x == 1.0));
}
