use crate::point::{Point2, Quad};

/// Fit a rectangle with the aspect ratio of `inner` centered inside `outer`.
///
/// With `zoom = 1.0` the longer side (relative to the outer aspect ratio)
/// touches the outer bounds; smaller values shrink the rectangle around the
/// center.
///
/// The inputs are not validated. A zero or non finite size yields `NaN` or
/// infinite corners.
///
/// # Arguments
///
/// * `inner_width` - Width of the rectangle to fit, any unit.
/// * `inner_height` - Height of the rectangle to fit, same unit as the width.
/// * `outer_width` - Width of the bounding canvas in pixels.
/// * `outer_height` - Height of the bounding canvas in pixels.
/// * `zoom` - Scale factor of the fitted rectangle.
///
/// # Returns
///
/// The corners in the order top-left, top-right, bottom-right, bottom-left.
///
/// # Example
///
/// ```
/// use trajvis_geometry::warp::fit_rect;
///
/// let quad = fit_rect(2.0, 1.0, 100.0, 100.0, 1.0);
///
/// assert_eq!([quad[0].x, quad[0].y], [0.0, 25.0]);
/// assert_eq!([quad[2].x, quad[2].y], [100.0, 75.0]);
/// ```
pub fn fit_rect(
    inner_width: f64,
    inner_height: f64,
    outer_width: f64,
    outer_height: f64,
    zoom: f64,
) -> Quad {
    let rate = (inner_width / inner_height) / (outer_width / outer_height);
    let scale = zoom
        * 0.5
        * if rate > 1.0 {
            outer_width / inner_width
        } else {
            outer_height / inner_height
        };

    let (center_x, center_y) = (outer_width / 2.0, outer_height / 2.0);
    let (half_w, half_h) = (inner_width * scale, inner_height * scale);

    [
        Point2::new(center_x - half_w, center_y - half_h),
        Point2::new(center_x + half_w, center_y - half_h),
        Point2::new(center_x + half_w, center_y + half_h),
        Point2::new(center_x - half_w, center_y + half_h),
    ]
}
