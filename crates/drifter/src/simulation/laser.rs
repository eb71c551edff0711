//! Mining laser targeting.
//!
//! The beam hits the nearest live asteroid that is closer than the laser
//! range and inside a forward cone (`dot(heading, direction) >= cone`).

use drifter_core::{Entity, EntityKind, Vec2};

/// Index of the asteroid the beam hits, if any.
#[must_use]
pub fn find_target(entities: &[Entity], origin: Vec2, heading: Vec2, range: f32, cone: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, entity) in entities.iter().enumerate() {
        if entity.kind != EntityKind::Asteroid || entity.is_removed() {
            continue;
        }
        let offset = entity.pos - origin;
        let distance = offset.length();
        if distance >= range || distance <= f32::EPSILON {
            continue;
        }
        if heading.dot(offset * (1.0 / distance)) < cone {
            continue;
        }
        if best.map_or(true, |(_, nearest)| distance < nearest) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use drifter_core::ResourceKind;
    use proptest::prelude::*;

    fn rock(x: f32, y: f32) -> Entity {
        Entity::asteroid(Vec2::new(x, y), Vec2::ZERO, 30.0, 0.0, 50.0, ResourceKind::Iron)
    }

    const RIGHT: Vec2 = Vec2::new(1.0, 0.0);

    #[test]
    fn test_picks_nearest_in_cone() {
        let entities = vec![rock(250.0, 0.0), rock(120.0, 10.0), rock(60.0, 0.0)];
        assert_eq!(find_target(&entities, Vec2::ZERO, RIGHT, 300.0, 0.9), Some(2));
    }

    #[test]
    fn test_ignores_out_of_cone_and_range() {
        let entities = vec![
            rock(0.0, 100.0),  // 90 degrees off
            rock(-100.0, 0.0), // behind
            rock(300.0, 0.0),  // exactly at range
            rock(100.0, 60.0), // ~31 degrees off
        ];
        assert_eq!(find_target(&entities, Vec2::ZERO, RIGHT, 300.0, 0.9), None);
    }

    #[test]
    fn test_skips_removed_and_non_asteroids() {
        let mut dead = rock(50.0, 0.0);
        dead.mark_removed();
        let entities = vec![
            dead,
            Entity::resource_drop(Vec2::new(40.0, 0.0), Vec2::ZERO, ResourceKind::Iron),
            Entity::hub(),
            rock(200.0, 0.0),
        ];
        assert_eq!(find_target(&entities, Vec2::new(-10.0, 0.0), RIGHT, 300.0, 0.9), Some(3));
    }

    #[test]
    fn test_cone_edge_is_inclusive() {
        // The unit direction to the rock is exactly (1, 0), so the dot
        // product equals the heading's x component bit for bit.
        let heading = Vec2::new(0.9, 0.19f32.sqrt());
        let entities = vec![rock(64.0, 0.0)];
        assert_eq!(find_target(&entities, Vec2::ZERO, heading, 300.0, 0.9), Some(0));

        let just_above = f32::from_bits(0.9f32.to_bits() + 1);
        assert_eq!(find_target(&entities, Vec2::ZERO, heading, 300.0, just_above), None);
    }

    fn qualifies(entity: &Entity, heading: Vec2, range: f32, cone: f32) -> Option<f32> {
        let distance = entity.pos.length();
        let inside = distance < range && distance > f32::EPSILON && heading.dot(entity.pos * (1.0 / distance)) >= cone;
        inside.then_some(distance)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_target_is_nearest_qualifying(
            rocks in proptest::collection::vec((-400.0f32..400.0, -400.0f32..400.0), 0..12),
            angle in -PI..PI,
        ) {
            let heading = Vec2::from_angle(angle);
            let entities: Vec<_> = rocks.iter().map(|&(x, y)| rock(x, y)).collect();

            let nearest = entities
                .iter()
                .filter_map(|e| qualifies(e, heading, 300.0, 0.9))
                .min_by(f32::total_cmp);

            match find_target(&entities, Vec2::ZERO, heading, 300.0, 0.9) {
                Some(index) => {
                    let distance = qualifies(&entities[index], heading, 300.0, 0.9);
                    prop_assert!(distance.is_some());
                    prop_assert_eq!(distance, nearest);
                }
                None => prop_assert!(nearest.is_none()),
            }
        }
    }
}
