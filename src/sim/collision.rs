//! Collision collaborator interface and a reference arena world
//!
//! The simulation never resolves physics itself. It asks a `Physics`
//! implementation what a ray hit, whether a sphere overlaps anything on a
//! layer, and where a body is; it nudges bodies with logical impulses.
//!
//! `ArenaWorld` is a deliberately small implementation: a ground plane,
//! static obstacle spheres on the `Object` layer, and spherical bodies. The
//! headless binary and the tests run against it; a real host plugs in its
//! engine instead.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Classification of a collider, the way a host engine tags scene objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Untagged,
    Ground,
    Player,
    Zombie,
}

/// Collision layer of a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Default,
    /// Solid scenery: blocks spawning and counts as walkable ground
    Object,
}

impl Layer {
    fn bit(self) -> u32 {
        match self {
            Layer::Default => 1 << 0,
            Layer::Object => 1 << 1,
        }
    }
}

/// Set of layers for overlap queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const OBJECT: Self = Self(1 << 1);

    pub fn of(layer: Layer) -> Self {
        Self(layer.bit())
    }

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }
}

/// Opaque handle to a body registered with the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// What kind of body to register
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub tag: Tag,
    pub layer: Layer,
    pub radius: f32,
    /// Affected by gravity and impulses
    pub dynamic: bool,
}

/// Nearest hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub tag: Tag,
    pub layer: Layer,
    /// Set when the hit collider is a registered body
    pub body: Option<BodyHandle>,
}

/// External collision/physics collaborator
pub trait Physics {
    /// Nearest hit along `direction` from `origin`. Colliders that contain
    /// the origin (the caster's own body) are ignored.
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit>;

    /// Whether a sphere overlaps any collider on the masked layers
    fn overlap_sphere(&self, point: Vec3, radius: f32, mask: LayerMask) -> bool;

    fn add_body(&mut self, desc: BodyDesc, position: Vec3) -> BodyHandle;

    fn remove_body(&mut self, body: BodyHandle);

    fn position(&self, body: BodyHandle) -> Option<Vec3>;

    /// Teleport a body (kinematic movement, respawn resets). Velocity is
    /// left alone so walking doesn't cancel a jump.
    fn set_position(&mut self, body: BodyHandle, position: Vec3);

    /// Logical velocity change on a dynamic body
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);

    /// Bring a body to rest (respawn between waves)
    fn stop(&mut self, body: BodyHandle);
}

/// Static obstacle sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone)]
struct Body {
    desc: BodyDesc,
    position: Vec3,
    velocity: Vec3,
}

/// Minimal reference world: flat ground, static spheres, spherical bodies
#[derive(Debug, Clone)]
pub struct ArenaWorld {
    ground_level: f32,
    gravity: f32,
    obstacles: Vec<Obstacle>,
    bodies: BTreeMap<BodyHandle, Body>,
    next_handle: u32,
}

impl ArenaWorld {
    pub fn new(ground_level: f32) -> Self {
        Self {
            ground_level,
            gravity: 9.81,
            obstacles: Vec::new(),
            bodies: BTreeMap::new(),
            next_handle: 1,
        }
    }

    pub fn add_obstacle(&mut self, center: Vec3, radius: f32) {
        self.obstacles.push(Obstacle { center, radius });
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    /// Integrate dynamic bodies under gravity and rest them on the ground
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for body in self.bodies.values_mut() {
            if !body.desc.dynamic {
                continue;
            }
            body.velocity.y -= self.gravity * dt;
            body.position += body.velocity * dt;
            if body.position.y < self.ground_level {
                body.position.y = self.ground_level;
                body.velocity.y = 0.0;
            }
        }
    }
}

/// Distance along a normalized ray to a sphere, ignoring spheres that
/// contain the origin
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = origin - center;
    let c = to_origin.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = to_origin.dot(dir);
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

impl Physics for ArenaWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut best: Option<RayHit> = None;
        let mut consider = |hit: RayHit| {
            if best.is_none_or(|b| hit.distance < b.distance) {
                best = Some(hit);
            }
        };

        if dir.y < 0.0 && origin.y >= self.ground_level {
            consider(RayHit {
                distance: (self.ground_level - origin.y) / dir.y,
                tag: Tag::Ground,
                layer: Layer::Default,
                body: None,
            });
        }

        for obstacle in &self.obstacles {
            if let Some(t) = ray_sphere(origin, dir, obstacle.center, obstacle.radius) {
                consider(RayHit {
                    distance: t,
                    tag: Tag::Untagged,
                    layer: Layer::Object,
                    body: None,
                });
            }
        }

        for (&handle, body) in &self.bodies {
            if let Some(t) = ray_sphere(origin, dir, body.position, body.desc.radius) {
                consider(RayHit {
                    distance: t,
                    tag: body.desc.tag,
                    layer: body.desc.layer,
                    body: Some(handle),
                });
            }
        }

        best
    }

    fn overlap_sphere(&self, point: Vec3, radius: f32, mask: LayerMask) -> bool {
        let overlaps = |center: Vec3, r: f32| center.distance(point) < r + radius;

        if mask.contains(Layer::Object)
            && self.obstacles.iter().any(|o| overlaps(o.center, o.radius))
        {
            return true;
        }
        self.bodies
            .values()
            .any(|b| mask.contains(b.desc.layer) && overlaps(b.position, b.desc.radius))
    }

    fn add_body(&mut self, desc: BodyDesc, position: Vec3) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            Body {
                desc,
                position,
                velocity: Vec3::ZERO,
            },
        );
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }

    fn position(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = position;
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.desc.dynamic {
                b.velocity += impulse;
            }
        }
    }

    fn stop(&mut self, body: BodyHandle) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity = Vec3::ZERO;
        }
    }
}
