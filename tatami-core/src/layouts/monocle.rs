use crate::models::Rect;

/// Every visible tiled client gets the whole work area, minus its own
/// border on each side.
pub fn update(work_area: Rect, border_widths: &[i32]) -> Vec<Rect> {
    border_widths
        .iter()
        .map(|&border| {
            Rect::new(
                work_area.x,
                work_area.y,
                work_area.w - 2 * border,
                work_area.h - 2 * border,
            )
        })
        .collect()
}
