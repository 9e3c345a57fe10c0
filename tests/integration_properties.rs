use cursor_wm::Config;
use cursor_wm::cursor::AxisOrientation;
use cursor_wm::mousebind::Direction;
use cursor_wm::node::OutputId;
use cursor_wm::scroll::ScrollAccumulator;
use cursor_wm::server::OutputInfo;
use cursor_wm::snap::edge_snap_info;
use cursor_wm::view::{TiledState, ViewEdge};
use cursor_wm::Rect;

fn output() -> OutputInfo {
    OutputInfo {
        id: OutputId(1),
        layout_box: Rect::new(0, 0, 1920, 1080),
        usable_area: Rect::new(0, 0, 1920, 1080),
        refresh_mhz: 60_000,
        usable: true,
    }
}

fn snap_config() -> Config {
    Config {
        snap_edge_range: 20,
        snap_edge_corner_range: 30,
        ..Config::default()
    }
}

#[test]
fn four_quarter_clicks_make_one_step() {
    let mut acc = ScrollAccumulator::new();
    let steps: Vec<bool> = (0..4)
        .map(|_| acc.accumulate(AxisOrientation::Vertical, 3.75, 30.0).run_action)
        .collect();
    assert_eq!(steps, vec![false, false, false, true]);
    assert_eq!(acc.remainder(AxisOrientation::Vertical).0, 0.0);
}

#[test]
fn fifth_quarter_click_carries_over() {
    let mut acc = ScrollAccumulator::new();
    let fired = (0..5)
        .filter(|_| acc.accumulate(AxisOrientation::Vertical, 3.75, 30.0).run_action)
        .count();
    assert_eq!(fired, 1);
    assert_eq!(acc.remainder(AxisOrientation::Vertical).0, 30.0);
    // Axes accumulate independently.
    assert_eq!(acc.remainder(AxisOrientation::Horizontal), (0.0, 0.0));
}

#[test]
fn partial_steps_still_report_a_direction() {
    let mut acc = ScrollAccumulator::new();
    let step = acc.accumulate(AxisOrientation::Horizontal, -3.75, -30.0);
    assert_eq!(step.direction, Some(Direction::Left));
    assert!(!step.run_action);
}

#[test]
fn corner_band_wins_over_the_plain_edge() {
    let info = edge_snap_info(&snap_config(), Some(&output()), 10.0, 10.0).expect("snap");
    assert_eq!(info.tiled_state, TiledState::UpLeft);
    assert_eq!(info.edge, ViewEdge::Left);
    assert_eq!(info.output, OutputId(1));

    let info = edge_snap_info(&snap_config(), Some(&output()), 1910.0, 1070.0).expect("snap");
    assert_eq!(info.tiled_state, TiledState::DownRight);
}

#[test]
fn side_bands_are_tested_before_top_and_bottom() {
    let config = snap_config();
    let info = edge_snap_info(&config, Some(&output()), 10.0, 500.0).expect("snap");
    assert_eq!(info.tiled_state, TiledState::Left);

    // Top band away from the corners maximizes.
    let info = edge_snap_info(&config, Some(&output()), 900.0, 5.0).expect("snap");
    assert_eq!(info.edge, ViewEdge::Up);
    assert_eq!(info.tiled_state, TiledState::Center);

    let plain_top = Config {
        snap_top_maximize: false,
        ..snap_config()
    };
    let info = edge_snap_info(&plain_top, Some(&output()), 900.0, 5.0).expect("snap");
    assert_eq!(info.tiled_state, TiledState::Up);

    assert_eq!(edge_snap_info(&config, Some(&output()), 900.0, 500.0), None);
}

#[test]
fn snapping_needs_a_usable_output_and_range() {
    let unusable = OutputInfo {
        usable: false,
        ..output()
    };
    assert_eq!(edge_snap_info(&snap_config(), Some(&unusable), 10.0, 10.0), None);
    assert_eq!(edge_snap_info(&snap_config(), None, 10.0, 10.0), None);

    let disabled = Config {
        snap_edge_range: 0,
        ..Config::default()
    };
    assert_eq!(edge_snap_info(&disabled, Some(&output()), 0.0, 0.0), None);
}

#[test]
fn usable_area_is_output_local() {
    let second = OutputInfo {
        id: OutputId(2),
        layout_box: Rect::new(1920, 0, 1280, 1024),
        usable_area: Rect::new(0, 30, 1280, 994),
        ..output()
    };
    // Left edge of the second output, below its top panel.
    let info = edge_snap_info(&snap_config(), Some(&second), 1925.0, 500.0).expect("snap");
    assert_eq!(info.tiled_state, TiledState::Left);
    assert_eq!(info.output, OutputId(2));
    // Just below the top panel is the top band of the usable area.
    let info = edge_snap_info(&snap_config(), Some(&second), 2500.0, 40.0).expect("snap");
    assert_eq!(info.edge, ViewEdge::Up);
}
