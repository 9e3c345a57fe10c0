//! Where a moved window lands when released near an output edge.

use crate::config::Config;
use crate::node::{OutputId, RegionId};
use crate::server::OutputInfo;
use crate::view::{TiledState, ViewEdge};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSnapInfo {
    pub tiled_state: TiledState,
    pub edge: ViewEdge,
    pub output: OutputId,
}

/// Snap destination shown while a move is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    Region(RegionId),
    Edge(EdgeSnapInfo),
}

/// Resolve the edge snap for a cursor position in layout coordinates.
///
/// Left and right bands are tested before top and bottom. A corner band
/// inside the matched edge turns the result into the diagonal state.
pub fn edge_snap_info(
    config: &Config,
    output: Option<&OutputInfo>,
    cursor_x: f64,
    cursor_y: f64,
) -> Option<EdgeSnapInfo> {
    let range = config.snap_edge_range;
    if range <= 0 {
        return None;
    }
    let Some(output) = output.filter(|o| o.usable) else {
        tracing::error!("output at cursor is unusable");
        return None;
    };

    let x = cursor_x - output.layout_box.x as f64;
    let y = cursor_y - output.layout_box.y as f64;
    let area = output.usable_area;
    let (left, right) = (area.x as f64, area.right() as f64);
    let (top, bottom) = (area.y as f64, area.bottom() as f64);
    let range = range as f64;
    let corner = config.snap_edge_corner_range as f64;

    let is_left = x <= left + range;
    let is_right = x >= right - range;
    let is_up = y <= top + range;
    let is_down = y >= bottom - range;
    let corners = config.snap_edge_corner_range > 0;
    let is_far_left = corners && x <= left + corner;
    let is_far_right = corners && x >= right - corner;
    let is_far_up = corners && y <= top + corner;
    let is_far_down = corners && y >= bottom - corner;

    let (edge, tiled_state) = if is_left {
        let state = if is_far_up {
            TiledState::UpLeft
        } else if is_far_down {
            TiledState::DownLeft
        } else {
            TiledState::Left
        };
        (ViewEdge::Left, state)
    } else if is_right {
        let state = if is_far_up {
            TiledState::UpRight
        } else if is_far_down {
            TiledState::DownRight
        } else {
            TiledState::Right
        };
        (ViewEdge::Right, state)
    } else if is_up {
        let state = if is_far_left {
            TiledState::UpLeft
        } else if is_far_right {
            TiledState::UpRight
        } else {
            TiledState::Up
        };
        (ViewEdge::Up, state)
    } else if is_down {
        let state = if is_far_left {
            TiledState::DownLeft
        } else if is_far_right {
            TiledState::DownRight
        } else {
            TiledState::Down
        };
        (ViewEdge::Down, state)
    } else {
        return None;
    };

    let tiled_state = if config.snap_top_maximize && tiled_state == TiledState::Up {
        TiledState::Center
    } else {
        tiled_state
    };

    Some(EdgeSnapInfo {
        tiled_state,
        edge,
        output: output.id,
    })
}
