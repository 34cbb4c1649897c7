// Coverage and symmetry properties of the ripple geometry.

use glam::DVec2;
use ripple_core::constants::SCALE_INITIAL;
use ripple_core::*;

const RATIOS: [f64; 7] = [0.05, 0.25, 0.5, 1.0, 2.0, 4.0, 20.0];

fn host_with_ratio(ratio: f64) -> HostBox {
    let height = 120.0;
    HostBox::new(DVec2::new(30.0, 70.0), DVec2::new(height * ratio, height))
}

fn point_at(host: &HostBox, x_pct: f64, y_pct: f64) -> DVec2 {
    host.origin + DVec2::new(x_pct, y_pct) * host.size / 100.0
}

// Disc centre in client coordinates
fn center_px(g: &RippleGeometry, host: &HostBox) -> DVec2 {
    point_at(host, g.left + g.width * 0.5, g.top + g.height * 0.5)
}

// Disc radius in host pixels once scaled to full size
fn full_radius_px(g: &RippleGeometry, host: &HostBox) -> f64 {
    g.width * host.size.x / 200.0
}

#[test]
fn full_size_disc_covers_every_corner() {
    for ratio in RATIOS {
        let host = host_with_ratio(ratio);
        let corners = [
            host.origin,
            host.origin + DVec2::new(host.size.x, 0.0),
            host.origin + DVec2::new(0.0, host.size.y),
            host.origin + host.size,
        ];
        for xi in 0..=10 {
            for yi in 0..=10 {
                let (x, y) = (xi as f64 * 10.0, yi as f64 * 10.0);
                let g = RippleGeometry::bounded(&host, point_at(&host, x, y));
                let center = center_px(&g, &host);
                let radius = full_radius_px(&g, &host);
                for corner in corners {
                    assert!(
                        center.distance(corner) <= radius + 1e-6,
                        "ratio={ratio} origin=({x},{y}) misses {corner:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn radius_bounds_hold_for_all_origins() {
    for ratio in RATIOS {
        let host = host_with_ratio(ratio);
        for xi in 0..=20 {
            for yi in 0..=20 {
                let (x, y) = (xi as f64 * 5.0, yi as f64 * 5.0);
                let g = RippleGeometry::bounded(&host, point_at(&host, x, y));
                let radius = g.width / 2.0;
                assert!(radius + 1e-9 >= x.max(100.0 - x));
                // Vertical reach in height-percent units covers the host
                let reach = g.height / 2.0;
                assert!(reach + 1e-9 >= y.max(100.0 - y));
            }
        }
    }
}

#[test]
fn disc_is_circular_on_screen() {
    for ratio in RATIOS {
        let host = host_with_ratio(ratio);
        let g = RippleGeometry::bounded(&host, point_at(&host, 30.0, 80.0));
        let w_px = g.width * host.size.x / 100.0;
        let h_px = g.height * host.size.y / 100.0;
        assert!((w_px - h_px).abs() < 1e-6 * w_px.max(1.0));
    }
}

#[test]
fn initial_dot_size_tracks_longer_side() {
    for ratio in RATIOS {
        let host = host_with_ratio(ratio);
        let g = RippleGeometry::bounded(&host, point_at(&host, 50.0, 50.0));
        let dot_px = g.initial_scale * g.width * host.size.x / 100.0;
        let longer = host.size.x.max(host.size.y);
        assert!((dot_px - SCALE_INITIAL * longer).abs() < 1e-6 * longer);
        assert!(g.initial_scale < 1.0);
    }
}

#[test]
fn unbounded_geometry_ignores_pointer() {
    let host = host_with_ratio(2.0);
    let a = RippleGeometry::compute(&host, point_at(&host, 0.0, 0.0), true);
    let b = RippleGeometry::compute(&host, point_at(&host, 90.0, 10.0), true);
    let c = RippleGeometry::compute(&host, DVec2::new(-500.0, 9000.0), true);
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a.width, 102.0);
    assert_eq!(a.left, -1.0);
    assert_eq!(a.initial_scale, SCALE_INITIAL);
}

#[test]
fn end_to_end_reference_click() {
    let host = HostBox::new(DVec2::ZERO, DVec2::new(200.0, 100.0));
    let g = RippleGeometry::bounded(&host, DVec2::new(150.0, 25.0));
    assert!((g.width - 167.705).abs() < 1e-3);
    assert!((g.height - 335.410).abs() < 1e-3);
    assert!((g.left - (75.0 - 83.8525)).abs() < 1e-3);
    assert!((g.top - (25.0 - 167.705)).abs() < 1e-3);
}
