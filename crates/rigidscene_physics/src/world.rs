//! Physics world and object registrations

use std::rc::Rc;

use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};
use rigidscene_core::SharedObject;
use rigidscene_math::{Quat, Vec3};
use slotmap::{new_key_type, SlotMap};

use crate::convert;
use crate::error::RegisterError;
use crate::motion_state::MotionState;
use crate::shape::CollisionShape;

new_key_type! {
    /// Key to a registration in the physics world
    ///
    /// Uses generational indexing, so a key never aliases a later registration.
    pub struct RegistrationKey;
}

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity acceleration
    pub gravity: Vec3,
    /// Length of one simulation step in seconds
    pub fixed_timestep: f32,
    /// Maximum steps taken per update; time beyond that is dropped
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -1.0, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 1,
        }
    }
}

impl PhysicsConfig {
    /// Create a physics config with the given gravity and default stepping
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }
}

/// One registered scene object and its simulation state
pub struct Registration {
    object: SharedObject,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    motion_state: MotionState,
    shape: CollisionShape,
}

impl Registration {
    /// The registered object
    pub fn object(&self) -> &SharedObject {
        &self.object
    }

    pub fn motion_state(&self) -> &MotionState {
        &self.motion_state
    }

    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    pub fn is_static(&self) -> bool {
        self.shape.local_inertia().is_none()
    }
}

/// The simulation world and the objects bound to it
///
/// Each update steps the simulation and writes every registered body's
/// position and orientation back onto its scene object.
pub struct PhysicsWorld {
    registrations: SlotMap<RegistrationKey, Registration>,
    /// Registration order, which is also update order
    order: Vec<RegistrationKey>,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    params: IntegrationParameters,
    /// Unsimulated time carried to the next update
    accumulator: f32,
    config: PhysicsConfig,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let params = IntegrationParameters {
            dt: config.fixed_timestep,
            ..IntegrationParameters::default()
        };
        Self {
            registrations: SlotMap::with_key(),
            order: Vec::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            params,
            accumulator: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Bind a scene object to a new rigid body
    ///
    /// A mass of zero creates an immovable body with an exact triangle mesh
    /// shape. Any positive mass creates a movable body with a convex hull
    /// shape and inertia computed for that mass. A negative or non-finite
    /// mass is rejected with [`RegisterError::InvalidMass`]. Shapes are baked
    /// with the object's current scale.
    ///
    /// The body starts at the object's translation with no rotation; the
    /// object's own rotation is not carried over.
    pub fn register_object(
        &mut self,
        object: &SharedObject,
        mass: f32,
    ) -> Result<RegistrationKey, RegisterError> {
        if self.registrations.values().any(|r| Rc::ptr_eq(&r.object, object)) {
            return Err(RegisterError::AlreadyRegistered);
        }
        if !mass.is_finite() || mass < 0.0 {
            return Err(RegisterError::InvalidMass(mass));
        }

        let (mut shape, translation) = {
            let obj = object.borrow();
            let mesh = obj.mesh().ok_or(RegisterError::MissingGeometry)?;
            let shape = if mass == 0.0 {
                CollisionShape::triangle_mesh(mesh, obj.scale())
            } else {
                CollisionShape::convex_hull(mesh, obj.scale(), mass)
            };
            (shape, obj.translation())
        };

        let (shared_shape, mass_properties) = shape.build()?;
        let motion_state = MotionState::at(translation);

        let body = match mass_properties {
            None => RigidBodyBuilder::fixed(),
            Some(_) => RigidBodyBuilder::dynamic(),
        }
        .translation(convert::to_vector(motion_state.translation))
        .build();

        let collider = match mass_properties {
            None => ColliderBuilder::new(shared_shape).density(0.0),
            Some(props) => ColliderBuilder::new(shared_shape).mass_properties(props),
        }
        .build();

        let body = self.bodies.insert(body);
        let collider = self.colliders.insert_with_parent(collider, body, &mut self.bodies);

        log::debug!(
            "Registered {:?} body (mass {}) at {:?}",
            shape.kind(),
            mass,
            motion_state.translation
        );

        let key = self.registrations.insert(Registration {
            object: Rc::clone(object),
            body,
            collider,
            motion_state,
            shape,
        });
        self.order.push(key);
        Ok(key)
    }

    /// Advance the simulation by `dt` seconds and sync every registered object
    ///
    /// Time is consumed in fixed steps of `fixed_timestep`, at most
    /// `max_substeps` per call; leftover time is carried to the next call.
    /// A non-positive or non-finite `dt` takes no step but still syncs.
    pub fn update(&mut self, dt: f32) {
        let steps = self.consume_time(dt);
        let gravity = convert::to_vector(self.config.gravity);
        for _ in 0..steps {
            self.pipeline.step(
                &gravity,
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
        }

        for key in &self.order {
            let Some(registration) = self.registrations.get_mut(*key) else {
                continue;
            };
            let Some(body) = self.bodies.get(registration.body) else {
                continue;
            };
            registration.motion_state.refresh(body.position());

            let Ok(mut object) = registration.object.try_borrow_mut() else {
                log::warn!("Skipping sync of {:?}: object is borrowed elsewhere", key);
                continue;
            };
            object.set_translation(registration.motion_state.translation);
            object.set_rotation(registration.motion_state.rotation.inverse());
            object.recompute_transform();
        }
    }

    /// Number of fixed steps to take for `dt`, updating the accumulator
    fn consume_time(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        let fixed = self.config.fixed_timestep;
        self.accumulator += dt;
        let available = (self.accumulator / fixed).floor();
        self.accumulator -= available * fixed;

        let steps = available as u32;
        if steps > self.config.max_substeps {
            log::debug!(
                "Dropping {} simulation steps (max_substeps = {})",
                steps - self.config.max_substeps,
                self.config.max_substeps
            );
        }
        steps.min(self.config.max_substeps)
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn contains(&self, key: RegistrationKey) -> bool {
        self.registrations.contains_key(key)
    }

    pub fn registration(&self, key: RegistrationKey) -> Option<&Registration> {
        self.registrations.get(key)
    }

    /// Keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = RegistrationKey> + '_ {
        self.order.iter().copied()
    }

    pub fn shape(&self, key: RegistrationKey) -> Option<&CollisionShape> {
        self.registrations.get(key).map(|r| &r.shape)
    }

    /// Principal inertia of a dynamic body; `None` for static bodies or unknown keys
    pub fn local_inertia(&self, key: RegistrationKey) -> Option<Vec3> {
        self.shape(key)?.local_inertia()
    }

    /// Local bounding box of the collider as seen by the simulation
    pub fn collider_local_bounds(&self, key: RegistrationKey) -> Option<(Vec3, Vec3)> {
        let registration = self.registrations.get(key)?;
        let aabb = self.colliders.get(registration.collider)?.shape().compute_local_aabb();
        Some((convert::from_point(&aabb.mins), convert::from_point(&aabb.maxs)))
    }

    pub fn body_translation(&self, key: RegistrationKey) -> Option<Vec3> {
        let body = self.bodies.get(self.registrations.get(key)?.body)?;
        Some(convert::from_isometry(body.position()).0)
    }

    /// Orientation of the body as the simulation stores it (not inverted)
    pub fn body_rotation(&self, key: RegistrationKey) -> Option<Quat> {
        let body = self.bodies.get(self.registrations.get(key)?.body)?;
        Some(convert::from_isometry(body.position()).1)
    }

    /// Set the linear velocity of a body; returns false for unknown keys
    pub fn set_linear_velocity(&mut self, key: RegistrationKey, velocity: Vec3) -> bool {
        match self.body_mut(key) {
            Some(body) => {
                body.set_linvel(convert::to_vector(velocity), true);
                true
            }
            None => false,
        }
    }

    /// Set the angular velocity of a body; returns false for unknown keys
    pub fn set_angular_velocity(&mut self, key: RegistrationKey, velocity: Vec3) -> bool {
        match self.body_mut(key) {
            Some(body) => {
                body.set_angvel(convert::to_vector(velocity), true);
                true
            }
            None => false,
        }
    }

    fn body_mut(&mut self, key: RegistrationKey) -> Option<&mut rapier3d::prelude::RigidBody> {
        let handle = self.registrations.get(key)?.body;
        self.bodies.get_mut(handle)
    }
}

impl Drop for PhysicsWorld {
    /// Release each body and its motion state before its collider
    fn drop(&mut self) {
        for key in self.order.drain(..) {
            let Some(registration) = self.registrations.remove(key) else {
                continue;
            };
            let _ = self.bodies.remove(
                registration.body,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                false,
            );
            let collider = registration.collider;
            // Motion state and object handle go with the registration
            drop(registration);
            let _ = self.colliders.remove(collider, &mut self.islands, &mut self.bodies, false);
        }
        log::debug!("Physics world released");
    }
}
