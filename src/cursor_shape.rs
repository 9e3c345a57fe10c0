//! Server-drawn cursor images.

use crate::geometry::ResizeEdges;
use crate::node::SurfaceId;

/// Cursor the compositor draws itself, or `Client` when the client under
/// the pointer owns the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CursorShape {
    Client,
    #[default]
    Default,
    Grab,
    ResizeNw,
    ResizeN,
    ResizeNe,
    ResizeE,
    ResizeSe,
    ResizeS,
    ResizeSw,
    ResizeW,
}

/// Which name table the loaded cursor theme understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorNames {
    /// freedesktop cursor names ("default", "grab", "nw-resize", ...).
    #[default]
    Xdg,
    /// Legacy X11 names, always present as built-in fallbacks.
    X11,
}

impl CursorShape {
    /// Cursor for an interactive resize of the given edges.
    ///
    /// # Panics
    ///
    /// Panics on masks naming opposite edges; callers derive edges from
    /// decoration parts or cursor halves, which never produce them.
    pub fn from_edges(edges: ResizeEdges) -> Self {
        const TABLE: [(ResizeEdges, CursorShape); 9] = [
            (ResizeEdges::empty(), CursorShape::Default),
            (ResizeEdges::TOP.union(ResizeEdges::LEFT), CursorShape::ResizeNw),
            (ResizeEdges::TOP, CursorShape::ResizeN),
            (ResizeEdges::TOP.union(ResizeEdges::RIGHT), CursorShape::ResizeNe),
            (ResizeEdges::RIGHT, CursorShape::ResizeE),
            (ResizeEdges::BOTTOM.union(ResizeEdges::RIGHT), CursorShape::ResizeSe),
            (ResizeEdges::BOTTOM, CursorShape::ResizeS),
            (ResizeEdges::BOTTOM.union(ResizeEdges::LEFT), CursorShape::ResizeSw),
            (ResizeEdges::LEFT, CursorShape::ResizeW),
        ];
        match TABLE.iter().find(|(mask, _)| *mask == edges) {
            Some(&(_, shape)) => shape,
            None => {
                tracing::error!(edges = ?edges, "failed to resolve resize edges to a cursor");
                panic!("invalid resize edge mask {edges:?}");
            }
        }
    }

    pub fn is_resize(self) -> bool {
        self > CursorShape::Grab
    }

    /// Theme name of the image, or `None` for the client-owned cursor.
    pub fn name(self, names: CursorNames) -> Option<&'static str> {
        let (xdg, x11) = match self {
            CursorShape::Client => return None,
            CursorShape::Default => ("default", "left_ptr"),
            CursorShape::Grab => ("grab", "grabbing"),
            CursorShape::ResizeNw => ("nw-resize", "top_left_corner"),
            CursorShape::ResizeN => ("n-resize", "top_side"),
            CursorShape::ResizeNe => ("ne-resize", "top_right_corner"),
            CursorShape::ResizeE => ("e-resize", "right_side"),
            CursorShape::ResizeSe => ("se-resize", "bottom_right_corner"),
            CursorShape::ResizeS => ("s-resize", "bottom_side"),
            CursorShape::ResizeSw => ("sw-resize", "bottom_left_corner"),
            CursorShape::ResizeW => ("w-resize", "left_side"),
        };
        Some(match names {
            CursorNames::Xdg => xdg,
            CursorNames::X11 => x11,
        })
    }
}

/// Image the host should show for the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorImage {
    Hidden,
    Named(String),
    /// Surface supplied by a client; `None` hides the cursor over it.
    Client {
        surface: Option<SurfaceId>,
        hotspot_x: i32,
        hotspot_y: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_map_to_compass_shapes() {
        assert_eq!(CursorShape::from_edges(ResizeEdges::empty()), CursorShape::Default);
        assert_eq!(
            CursorShape::from_edges(ResizeEdges::BOTTOM | ResizeEdges::LEFT),
            CursorShape::ResizeSw
        );
        assert_eq!(CursorShape::from_edges(ResizeEdges::TOP), CursorShape::ResizeN);
    }

    #[test]
    #[should_panic(expected = "invalid resize edge mask")]
    fn opposite_edges_are_fatal() {
        CursorShape::from_edges(ResizeEdges::TOP | ResizeEdges::BOTTOM);
    }

    #[test]
    fn fallback_names_cover_every_server_cursor() {
        assert_eq!(CursorShape::Grab.name(CursorNames::Xdg), Some("grab"));
        assert_eq!(CursorShape::Grab.name(CursorNames::X11), Some("grabbing"));
        assert_eq!(CursorShape::ResizeE.name(CursorNames::X11), Some("right_side"));
        assert_eq!(CursorShape::Client.name(CursorNames::Xdg), None);
    }

    #[test]
    fn only_compass_shapes_are_resize() {
        assert!(CursorShape::ResizeNw.is_resize());
        assert!(!CursorShape::Grab.is_resize());
        assert!(!CursorShape::Default.is_resize());
    }
}
