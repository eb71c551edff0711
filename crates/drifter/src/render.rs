//! # Render Frame
//!
//! Screen-space geometry for one frame, built from the simulation without
//! touching it. Any backend (canvas, GPU, terminal) implements
//! [`SceneRenderer`] and draws a [`RenderFrame`].
//!
//! ## Culling
//!
//! Entities whose screen position lies outside the viewport grown by
//! [`CULL_MARGIN`] are left out of the draw list. They are still simulated.

use std::f32::consts::TAU;

use drifter_core::{Color, EntityKind, Vec2};
use drifter_economy::EconomyConfig;
use drifter_procedural::noise;

use crate::simulation::SimulationContext;

/// Screen-space margin around the viewport inside which entities are drawn.
pub const CULL_MARGIN: f32 = 100.0;

/// Background grid spacing.
pub const GRID_SIZE: f32 = 100.0;

/// Vertices in an asteroid outline.
pub const ASTEROID_VERTICES: usize = 8;

/// Ship hull in ship space, nose along +x.
pub const SHIP_OUTLINE: [Vec2; 4] = [
    Vec2::new(10.0, 0.0),
    Vec2::new(-10.0, 7.0),
    Vec2::new(-6.0, 0.0),
    Vec2::new(-10.0, -7.0),
];

/// Distance ahead of the ship where the beam starts.
pub const LASER_START: f32 = 10.0;

/// Ship colour.
pub const SHIP_COLOR: Color = Color::hex(0xA3_E635);
/// Asteroid outline colour.
pub const ASTEROID_COLOR: Color = Color::hex(0x9C_A3AF);
/// Hub and laser colour.
pub const HUB_COLOR: Color = Color::hex(0x22_D3EE);
/// Hub ring radius as drawn.
pub const HUB_RING_RADIUS: f32 = 40.0;
/// Resource drops are drawn as dots of this radius.
pub const RESOURCE_DOT_RADIUS: f32 = 4.0;

/// One culled, projected entity.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawItem {
    /// The player ship.
    Ship {
        /// Hull polygon in screen space.
        outline: [Vec2; 4],
        /// Heading in radians.
        angle: f32,
        /// Forward thrust held (draw the flame).
        thrusting: bool,
    },
    /// An asteroid.
    Asteroid {
        /// Jagged outline in screen space.
        outline: [Vec2; ASTEROID_VERTICES],
        /// Remaining health as a fraction of max.
        integrity: f32,
    },
    /// The station hub.
    Hub {
        /// Centre in screen space.
        centre: Vec2,
        /// Ring radius.
        radius: f32,
    },
    /// A floating resource drop.
    Resource {
        /// Centre in screen space.
        centre: Vec2,
        /// Resource colour.
        color: Color,
    },
}

/// The mining beam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaserBeam {
    /// Beam start in screen space.
    pub from: Vec2,
    /// Beam end in screen space.
    pub to: Vec2,
}

/// A projected particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSprite {
    /// Top-left corner in screen space.
    pub pos: Vec2,
    /// Square size.
    pub size: f32,
    /// Fill colour.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderFrame {
    /// Camera (world position of the top-left corner).
    pub camera: Vec2,
    /// Viewport size.
    pub viewport: Vec2,
    /// Offset of the first grid line on each axis.
    pub grid_offset: Vec2,
    /// Entities to draw, in list order.
    pub items: Vec<DrawItem>,
    /// Particles to draw.
    pub particles: Vec<ParticleSprite>,
    /// The beam, while firing.
    pub laser: Option<LaserBeam>,
    /// Player position readout, floored.
    pub position_readout: Option<(i64, i64)>,
    /// Entities skipped by culling.
    pub culled: usize,
}

impl RenderFrame {
    /// Projects the simulation for drawing.
    #[must_use]
    pub fn build(sim: &SimulationContext, economy: &EconomyConfig) -> Self {
        let camera = sim.camera;
        let viewport = sim.viewport;
        let mut frame = Self {
            camera,
            viewport,
            grid_offset: grid_offset(camera),
            ..Self::default()
        };

        for entity in &sim.entities {
            let screen = entity.pos - camera;
            if !is_on_screen(screen, viewport) {
                frame.culled += 1;
                continue;
            }
            let item = match entity.kind {
                EntityKind::Player => DrawItem::Ship {
                    outline: ship_outline(screen, entity.angle),
                    angle: entity.angle,
                    thrusting: sim.thrusting(),
                },
                EntityKind::Asteroid => DrawItem::Asteroid {
                    outline: asteroid_outline(screen, entity.radius, entity.shape_seed()),
                    integrity: match (entity.health, entity.max_health) {
                        (Some(health), Some(max)) if max > 0.0 => (health / max).clamp(0.0, 1.0),
                        _ => 1.0,
                    },
                },
                EntityKind::Hub => DrawItem::Hub {
                    centre: screen,
                    radius: HUB_RING_RADIUS,
                },
                EntityKind::Resource => DrawItem::Resource {
                    centre: screen,
                    color: entity.resource.map_or(ASTEROID_COLOR, |kind| economy.color(kind)),
                },
            };
            frame.items.push(item);
        }

        if let Some(player) = sim.player() {
            let screen = player.pos - camera;
            if sim.laser_active() {
                let heading = Vec2::from_angle(player.angle);
                frame.laser = Some(LaserBeam {
                    from: screen + heading * LASER_START,
                    to: screen + heading * sim.state.player.laser_range,
                });
            }
            frame.position_readout = Some((player.pos.x.floor() as i64, player.pos.y.floor() as i64));
        }

        frame.particles = sim
            .particles
            .iter()
            .map(|p| ParticleSprite {
                pos: p.pos - camera,
                size: p.size,
                color: p.color,
                alpha: p.fade(),
            })
            .collect();

        frame
    }
}

/// Receives finished frames.
pub trait SceneRenderer {
    /// Draws one frame.
    fn draw(&mut self, frame: &RenderFrame);
}

/// Offset of the first grid line, in `[0, GRID_SIZE)` on each axis.
#[inline]
#[must_use]
pub fn grid_offset(camera: Vec2) -> Vec2 {
    Vec2::new((-camera.x).rem_euclid(GRID_SIZE), (-camera.y).rem_euclid(GRID_SIZE))
}

/// True if a screen position falls inside the culling rectangle.
#[inline]
#[must_use]
pub fn is_on_screen(screen: Vec2, viewport: Vec2) -> bool {
    (-CULL_MARGIN..=viewport.x + CULL_MARGIN).contains(&screen.x)
        && (-CULL_MARGIN..=viewport.y + CULL_MARGIN).contains(&screen.y)
}

/// Jagged asteroid polygon centred on `centre`.
///
/// Vertex `i` sits at angle `2*pi*i/8` and distance
/// `radius * (0.8 + 0.4 * noise(seed + i))`, so a given asteroid keeps its
/// shape from frame to frame.
#[must_use]
pub fn asteroid_outline(centre: Vec2, radius: f32, seed: f64) -> [Vec2; ASTEROID_VERTICES] {
    let mut outline = [Vec2::ZERO; ASTEROID_VERTICES];
    for (i, vertex) in outline.iter_mut().enumerate() {
        let angle = i as f32 / ASTEROID_VERTICES as f32 * TAU;
        let scale = 0.8 + 0.4 * noise(seed + i as f64) as f32;
        *vertex = centre + Vec2::from_angle(angle) * (radius * scale);
    }
    outline
}

/// Ship hull rotated by `angle` and placed at `centre`.
#[must_use]
pub fn ship_outline(centre: Vec2, angle: f32) -> [Vec2; 4] {
    SHIP_OUTLINE.map(|point| centre + point.rotate(angle))
}

/// A renderer that only counts what it is given.
#[derive(Debug, Default)]
pub struct CountingRenderer {
    /// Frames drawn.
    pub frames: u64,
    /// Draw items across all frames.
    pub items: u64,
    /// The most recent frame.
    pub last: Option<RenderFrame>,
}

impl SceneRenderer for CountingRenderer {
    fn draw(&mut self, frame: &RenderFrame) {
        self.frames += 1;
        self.items += frame.items.len() as u64;
        self.last = Some(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drifter_core::{Entity, Particle, ResourceKind};
    use drifter_economy::GameState;
    use drifter_procedural::WorldSeed;

    use crate::simulation::SimConfig;

    fn sim() -> SimulationContext {
        let economy = EconomyConfig::default();
        let mut state = GameState::new(&economy);
        state.position = Vec2::new(0.0, -80.0);
        SimulationContext::new(state, SimConfig::default(), WorldSeed::default(), Vec2::new(800.0, 600.0), 1)
    }

    #[test]
    fn test_grid_offset_wraps_negative() {
        assert_eq!(grid_offset(Vec2::new(250.0, -30.0)), Vec2::new(50.0, 30.0));
        assert_eq!(grid_offset(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_cull_rectangle() {
        let viewport = Vec2::new(800.0, 600.0);
        assert!(is_on_screen(Vec2::new(-100.0, 700.0), viewport));
        assert!(!is_on_screen(Vec2::new(-100.5, 10.0), viewport));
        assert!(!is_on_screen(Vec2::new(10.0, 700.5), viewport));
    }

    #[test]
    fn test_asteroid_outline_is_stable_and_bounded() {
        let a = asteroid_outline(Vec2::ZERO, 30.0, 1234.0);
        let b = asteroid_outline(Vec2::ZERO, 30.0, 1234.0);
        assert_eq!(a, b);
        for vertex in a {
            let d = vertex.length();
            assert!((24.0 - 1e-3..=36.0 + 1e-3).contains(&d));
        }
    }

    #[test]
    fn test_ship_outline_rotates() {
        let outline = ship_outline(Vec2::new(100.0, 100.0), std::f32::consts::FRAC_PI_2);
        // Nose (10, 0) rotated a quarter turn points down the screen.
        assert!((outline[0].x - 100.0).abs() < 1e-4);
        assert!((outline[0].y - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_frame_culls_and_projects() {
        let mut sim = sim();
        sim.entities.push(Entity::resource_drop(Vec2::new(50.0, -80.0), Vec2::ZERO, ResourceKind::Gold));
        sim.entities
            .push(Entity::resource_drop(Vec2::new(5000.0, 5000.0), Vec2::ZERO, ResourceKind::Iron));

        let frame = RenderFrame::build(&sim, &EconomyConfig::default());

        assert_eq!(frame.camera, Vec2::new(-400.0, -380.0));
        assert_eq!(frame.culled, 1);
        assert_eq!(frame.position_readout, Some((0, -80)));
        assert!(frame.laser.is_none());
        assert!(frame.items.iter().any(|item| matches!(item, DrawItem::Hub { .. })));
        assert!(frame.items.contains(&DrawItem::Resource {
            centre: Vec2::new(450.0, 300.0),
            color: Color::hex(0xFA_CC15),
        }));
    }

    #[test]
    fn test_particle_alpha_follows_life() {
        let mut sim = sim();
        let mut particle = Particle::new(Vec2::ZERO, Vec2::ZERO, 2.0, Color(0), 4.0);
        particle.life = 0.5;
        sim.particles.push(particle);

        let frame = RenderFrame::build(&sim, &EconomyConfig::default());
        assert_eq!(frame.particles.len(), 1);
        assert!((frame.particles[0].alpha - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_counting_renderer() {
        let mut renderer = CountingRenderer::default();
        renderer.draw(&RenderFrame::build(&sim(), &EconomyConfig::default()));
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.items, 2);
    }
}
