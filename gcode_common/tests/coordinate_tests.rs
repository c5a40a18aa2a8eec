//! Coordinate model behaviour across modules.
//!
//! Conversion round-trips, equality/hash consistency, rotation inverses and
//! the copy semantics of modal state, checked over a spread of sample values.

use gcode_common::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of(p: &Position) -> u64 {
    let mut h = DefaultHasher::new();
    p.hash(&mut h);
    h.finish()
}

fn samples() -> Vec<Position> {
    vec![
        Position::ZERO,
        Position::new(1.0, -2.5, 3.25, Units::Mm),
        Position::full(-100.0, 0.001, 42.0, 90.0, -45.0, 360.0, Units::Mm),
        Position::full(0.5, 0.25, -0.125, 1.0, 2.0, 3.0, Units::Inch),
        Position::full(7.0, 8.0, 9.0, f64::NAN, 0.0, f64::NAN, Units::Inch),
    ]
}

#[test]
fn unit_roundtrip_restores_position() {
    for p in samples() {
        for u1 in [Units::Mm, Units::Inch] {
            for u2 in [Units::Mm, Units::Inch] {
                let back = p
                    .get_position_in(u1)
                    .get_position_in(u2)
                    .get_position_in(p.units());
                assert_eq!(back, p, "{p} via {u1}/{u2}");
                for axis in Axis::ROTATIONAL {
                    assert_eq!(back.get(axis).to_bits(), p.get(axis).to_bits());
                }
            }
        }
    }
}

#[test]
fn equality_is_reflexive_and_symmetric() {
    let all = samples();
    for p in &all {
        assert_eq!(p, p);
        for q in &all {
            assert_eq!(p == q, q == p);
        }
    }
    assert_eq!(Position::INVALID, Position::INVALID);
}

#[test]
fn hash_agrees_with_equality() {
    for p in samples() {
        let mut nudged = p;
        nudged.add_axis(Axis::X, EPSILON / 10.0, p.units());
        assert_eq!(nudged, p);
        assert_eq!(hash_of(&nudged), hash_of(&p), "{nudged} hashed apart from {p}");
    }
}

#[test]
fn rotation_inverse_over_angles() {
    let center = Position::new(10.0, -5.0, 0.0, Units::Mm);
    for p in samples() {
        for theta in [0.1, 1.0, std::f64::consts::PI, -2.3] {
            let r = p.rotate(&center, theta).rotate(&center, -theta);
            assert!((r.x - p.x).abs() < EPSILON);
            assert!((r.y - p.y).abs() < EPSILON);
            assert_eq!(r.z.to_bits(), p.z.to_bits());
        }
    }
}

#[test]
fn sparse_position_tracks_only_touched_axes() {
    let partial = PartialPosition::new(Units::Mm)
        .with(Axis::X, -5.1)
        .with(Axis::Z, 2.0);
    let touched: Vec<(Axis, f64)> = partial.iter().collect();
    assert_eq!(touched, vec![(Axis::X, -5.1), (Axis::Z, 2.0)]);
}

#[test]
fn modal_state_snapshot_is_independent() {
    let live = ModalState::new(Units::Inch);
    let mut handed_out = live;
    handed_out.current_point.add_axis(Axis::Y, 1.0, Units::Inch);
    handed_out.motion_mode = MotionMode::Linear;
    assert_eq!(live.current_point, Position::zero_in(Units::Inch));
    assert_eq!(live.motion_mode, MotionMode::Rapid);
}
