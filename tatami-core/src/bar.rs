//! The per-monitor status bar: tag cells, layout symbol, window title and
//! the status text, drawn through the draw context onto an
//! override-redirect strip window.
use crate::drw::{Drw, SchemeId};
use crate::state::State;

/// The two schemes the bar (and the borders) draw with.
#[derive(Debug, Clone, Copy)]
pub struct Schemes {
    pub normal: SchemeId,
    pub selected: SchemeId,
}

/// What a click on the bar landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarClick {
    Tag(usize),
    LayoutSymbol,
    Status,
    Title,
}

/// The bar is one primary-font line plus a pixel of breathing room above
/// and below.
#[must_use]
pub fn bar_height(drw: &Drw) -> i32 {
    drw.font_height() as i32 + 2
}

/// Maps a click x offset to the bar segment under it, given the rendered
/// segment widths (all including their padding).
#[must_use]
pub fn resolve_click(
    tag_widths: &[u32],
    layout_symbol_width: u32,
    status_width: u32,
    bar_width: i32,
    click_x: i32,
) -> BarClick {
    let mut x = 0;
    for (index, &width) in tag_widths.iter().enumerate() {
        x += width as i32;
        if click_x < x {
            return BarClick::Tag(index);
        }
    }
    if click_x < x + layout_symbol_width as i32 {
        return BarClick::LayoutSymbol;
    }
    if click_x > bar_width - status_width as i32 {
        return BarClick::Status;
    }
    BarClick::Title
}

/// Redraws one monitor's bar and maps it onto the bar window.
pub fn draw_bar(
    drw: &mut Drw,
    state: &State,
    tags: &[String],
    monitor_index: usize,
    schemes: Schemes,
) {
    let monitor = &state.monitors[monitor_index];
    let bar_height = state.bar_height as u32;
    let bar_width = monitor.work.w;
    let lrpad = drw.font_height();
    let box_offset = (drw.font_height() / 9) as i32;
    let box_size = drw.font_height() / 6 + 2;

    // Draw the status first so the tags can overdraw it when space runs
    // out. Status only shows on the selected monitor.
    let mut status_width = 0;
    if monitor_index == state.selected_monitor {
        drw.set_scheme(schemes.normal);
        status_width = drw.text_width(&state.status_text) + 2;
        drw.text(
            bar_width - status_width as i32,
            0,
            status_width,
            bar_height,
            0,
            &state.status_text,
            false,
        );
    }

    let mut occupied = 0;
    let mut urgent = 0;
    for &id in &monitor.clients {
        if let Some(client) = state.clients.get(id) {
            occupied |= client.tags;
            if client.is_urgent {
                urgent |= client.tags;
            }
        }
    }

    let selected_client = monitor.selected.and_then(|id| state.clients.get(id));
    let mut x = 0;
    for (index, tag) in tags.iter().enumerate() {
        let width = drw.text_width(tag) + lrpad;
        let active = monitor.current_tags() & (1 << index) != 0;
        let inverted = urgent & (1 << index) != 0;
        drw.set_scheme(if active { schemes.selected } else { schemes.normal });
        drw.text(x, 0, width, bar_height, lrpad / 2, tag, inverted);
        if occupied & (1 << index) != 0 {
            // Filled square when the selected client occupies this tag,
            // hollow when only others do.
            let filled = monitor_index == state.selected_monitor
                && selected_client.is_some_and(|c| c.tags & (1 << index) != 0);
            drw.rect(x + box_offset, box_offset, box_size, box_size, filled, inverted);
        }
        x += width as i32;
    }

    let symbol_width = drw.text_width(&monitor.layout_symbol) + lrpad;
    drw.set_scheme(schemes.normal);
    x = drw.text(
        x,
        0,
        symbol_width,
        bar_height,
        lrpad / 2,
        &monitor.layout_symbol,
        false,
    );

    let title_width = bar_width - status_width as i32 - x;
    if title_width > state.bar_height {
        if let Some(client) = selected_client {
            let scheme = if monitor_index == state.selected_monitor {
                schemes.selected
            } else {
                schemes.normal
            };
            drw.set_scheme(scheme);
            drw.text(x, 0, title_width as u32, bar_height, lrpad / 2, &client.name, false);
            if client.is_floating {
                drw.rect(
                    x + box_offset,
                    box_offset,
                    box_size,
                    box_size,
                    client.is_fixed(),
                    false,
                );
            }
        } else {
            drw.set_scheme(schemes.normal);
            drw.rect(x, 0, title_width as u32, bar_height, true, true);
        }
    }

    drw.map(monitor.bar_window, 0, 0, bar_width as u32, bar_height);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nine tag cells of 30px, a 40px layout symbol, 100px of status on a
    // 1920px bar.
    const TAGS: [u32; 9] = [30; 9];

    #[test]
    fn clicks_on_tag_cells_resolve_to_their_index() {
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 0), BarClick::Tag(0));
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 29), BarClick::Tag(0));
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 30), BarClick::Tag(1));
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 269), BarClick::Tag(8));
    }

    #[test]
    fn clicks_past_the_tags_hit_the_layout_symbol() {
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 270), BarClick::LayoutSymbol);
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 309), BarClick::LayoutSymbol);
    }

    #[test]
    fn clicks_in_the_middle_hit_the_title() {
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 310), BarClick::Title);
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 1820), BarClick::Title);
    }

    #[test]
    fn clicks_on_the_right_edge_hit_the_status() {
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 1821), BarClick::Status);
        assert_eq!(resolve_click(&TAGS, 40, 100, 1920, 1919), BarClick::Status);
    }
}
