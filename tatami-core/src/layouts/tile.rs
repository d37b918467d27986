use crate::models::Rect;

/// The classic master/stack split. Masters fill the left column at
/// `mfact` of the work-area width, everyone else stacks in the right
/// column, and a uniform gap surrounds every tile.
pub fn update(
    work_area: Rect,
    gap_px: i32,
    mfact: f32,
    masters_count: u32,
    border_widths: &[i32],
) -> Vec<Rect> {
    let n = border_widths.len();
    if n == 0 {
        return Vec::new();
    }
    let masters = masters_count as usize;

    let master_width = if n > masters {
        if masters == 0 {
            0
        } else {
            (work_area.w as f32 * mfact) as i32
        }
    } else {
        work_area.w - gap_px
    };

    let mut rects = Vec::with_capacity(n);
    let mut master_y = gap_px;
    let mut stack_y = gap_px;

    for (index, &border) in border_widths.iter().enumerate() {
        if index < masters {
            let remaining = n.min(masters) - index;
            let height = (work_area.h - master_y) / remaining as i32 - gap_px;
            rects.push(Rect::new(
                work_area.x + gap_px,
                work_area.y + master_y,
                master_width - 2 * border - gap_px,
                height - 2 * border,
            ));
            master_y += height + gap_px;
        } else {
            let remaining = n - index;
            let height = (work_area.h - stack_y) / remaining as i32 - gap_px;
            rects.push(Rect::new(
                work_area.x + master_width + gap_px,
                work_area.y + stack_y,
                work_area.w - master_width - 2 * border - 2 * gap_px,
                height - 2 * border,
            ));
            stack_y += height + gap_px;
        }
    }

    rects
}
