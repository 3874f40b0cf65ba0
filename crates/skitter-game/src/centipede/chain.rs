//! Head-led segment chain
//!
//! The head turns toward a steering point at a bounded rate and walks
//! forward. Every body segment, then the tail, faces the link ahead of it and
//! steps along its own forward axis by the slack beyond `segment_length`.
//! That relaxation is recomputed once per frame, so a moving head drags the
//! chain into a smooth trailing curve.

use glam::{Vec2, Vec3};
use skitter_core::{fit_dest_angle_to_src, CollisionMask, Transform};
use tracing::{debug, info, trace};

use crate::error::GameError;
use crate::scene::{ActorLoader, ActorNode, CollisionSphere, SceneNode};

use super::CentipedeConfig;

/// One player's centipede
pub struct SegmentChain<A, M> {
    config: CentipedeConfig,
    index: u32,
    head: A,
    /// Head to tail order
    body: Vec<A>,
    tail: A,
    /// Point the head turns toward
    steering: M,
    /// Last externally requested destination
    destination: Option<Vec3>,
    segment_length: f32,
    into_mask: CollisionMask,
    spawn_position: Vec2,
    spawn_heading: f32,
}

impl<A: ActorNode, M: SceneNode> SegmentChain<A, M> {
    /// Spawn player `index` of `num_players` around the arena centre
    pub fn new<L>(
        loader: &mut L,
        index: u32,
        num_players: u32,
        config: CentipedeConfig,
    ) -> Result<Self, GameError>
    where
        L: ActorLoader<Actor = A, Marker = M>,
    {
        if num_players == 0 {
            return Err(GameError::InvalidConfig(
                "a centipede needs at least one player slot".into(),
            ));
        }

        let into_mask = CollisionMask::bit(index.saturating_add(1));
        let spawn_heading = 360.0 / num_players as f32 * (index as f32 + 1.0);

        // Nothing is attached or registered until both actors loaded with bounds
        let mut head = load_actor(loader, &config)?;
        let (min, max) = head
            .tight_bounds()
            .ok_or_else(|| GameError::MissingBounds(config.model.clone()))?;
        let segment_length = (max - min).x * config.segment_length_factor;
        let mut tail = load_actor(loader, &config)?;

        let mut pose = head.transform();
        pose.set_heading(spawn_heading);
        pose.translate_local(Vec3::new(0.0, -config.spawn_distance, 0.0));
        head.set_transform(pose);

        head.attach_to_root();
        tail.attach_to_root();
        loader.register_collision(&head, collision_sphere("Head", &config, into_mask, true));
        loader.register_collision(&tail, collision_sphere("Tail", &config, into_mask, false));

        let steering = loader.create_marker(&format!("Destination{index}"));

        let mut chain = Self {
            config,
            index,
            head,
            body: Vec::new(),
            tail,
            steering,
            destination: None,
            segment_length,
            into_mask,
            spawn_position: pose.position.truncate(),
            spawn_heading,
        };
        chain.reset();

        info!(
            "Centipede {} spawned at {:?} heading {:.1}, segment length {:.2}",
            index, chain.spawn_position, spawn_heading, segment_length
        );
        Ok(chain)
    }

    /// Per-frame driver
    pub fn update(&mut self, dt: f32) {
        self.update_rotation(dt);
        self.move_forward(dt, 1.0);
    }

    /// Turn the head toward the steering point by at most `turn_rate * dt` degrees.
    ///
    /// Once the head lines up, the steering point is re-seeded straight ahead.
    pub fn update_rotation(&mut self, dt: f32) {
        let mut head = self.head.transform();
        let old_heading = head.heading();

        let mut facing = head;
        facing.heads_up(self.steering.transform().position);
        let new_heading = fit_dest_angle_to_src(old_heading, facing.heading());

        let delta = new_heading - old_heading;
        let change = if delta < 0.0 {
            -dt * self.config.turn_rate
        } else {
            dt * self.config.turn_rate
        };

        if delta.abs() < change.abs() {
            head.set_heading(new_heading);
            self.head.set_transform(head);
            self.reseed_steering(&head);
        } else {
            head.set_heading(old_heading + change);
            self.head.set_transform(head);
        }
    }

    /// Walk the head forward and drag the rest of the chain after it
    pub fn move_forward(&mut self, dt: f32, multiplier: f32) {
        let mut leader = self.head.transform();
        leader.translate_local(Vec3::new(0.0, dt * multiplier * self.config.forward_speed, 0.0));
        self.head.set_transform(leader);
        trace!("Centipede {} head at {:?}", self.index, leader.position);

        for segment in &mut self.body {
            leader = follow(segment, &leader, self.segment_length);
        }
        follow(&mut self.tail, &leader, self.segment_length);
    }

    /// Grow by one segment, inserted just ahead of the tail
    pub fn add_length<L>(&mut self, loader: &mut L) -> Result<(), GameError>
    where
        L: ActorLoader<Actor = A, Marker = M>,
    {
        let mut segment = spawn_actor(loader, &self.config)?;
        let tail = self.tail.transform();
        let pose = Transform::from_position_hpr(tail.position, Vec3::new(tail.heading(), 0.0, 0.0));
        segment.set_transform(pose);

        let name = format!("Body-{}", self.body.len());
        loader.register_collision(
            &segment,
            collision_sphere(&name, &self.config, self.into_mask, false),
        );
        self.body.push(segment);

        let mut tail = self.tail.transform();
        tail.set_pos_relative(&pose, Vec3::new(0.0, -self.config.tail_gap, 0.0));
        self.tail.set_transform(tail);

        debug!("Centipede {} grew to {} segments", self.index, self.body.len());
        Ok(())
    }

    /// Drop every body segment and put head and tail back at the spawn pose
    pub fn reset(&mut self) {
        for mut segment in self.body.drain(..) {
            segment.detach();
        }

        let mut head = self.head.transform();
        head.position.x = self.spawn_position.x;
        head.position.y = self.spawn_position.y;
        head.set_heading(self.spawn_heading);
        self.head.set_transform(head);

        let mut tail = self.tail.transform();
        tail.set_heading(self.spawn_heading);
        tail.set_pos_relative(&head, Vec3::new(0.0, -self.segment_length, 0.0));
        self.tail.set_transform(tail);

        self.reseed_steering(&head);
        debug!("Centipede {} reset", self.index);
    }

    /// Steer toward a ground point. Height is ignored.
    pub fn set_destination(&mut self, point: Vec3) {
        let destination = Vec3::new(point.x, point.y, 0.0);
        self.destination = Some(destination);
        self.steering.set_position(destination);
    }

    /// Last requested destination as `(x, y)`, for replication
    pub fn destination_update(&self) -> Option<Vec2> {
        self.destination.map(|d| d.truncate())
    }

    /// Remove the centipede from the scene
    pub fn destroy(mut self) {
        self.reset();
        self.head.detach();
        self.tail.detach();
        self.steering.detach();
        info!("Centipede {} destroyed", self.index);
    }

    pub fn head(&self) -> &A {
        &self.head
    }

    pub fn tail(&self) -> &A {
        &self.tail
    }

    pub fn body(&self) -> &[A] {
        &self.body
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    pub fn into_mask(&self) -> CollisionMask {
        self.into_mask
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Point the head is currently turning toward
    pub fn steering_point(&self) -> Vec3 {
        self.steering.transform().position
    }

    fn reseed_steering(&mut self, head: &Transform) {
        let mut steering = self.steering.transform();
        steering.set_pos_relative(head, Vec3::new(0.0, self.config.steer_lookahead, 0.0));
        self.steering.set_transform(steering);
    }
}

/// Face `leader` and close the gap to `length`. Returns the node's new transform.
fn follow<N: SceneNode>(node: &mut N, leader: &Transform, length: f32) -> Transform {
    let mut pose = node.transform();
    pose.heads_up(leader.position);
    let slack = pose.distance(leader) - length;
    pose.translate_local(Vec3::new(0.0, slack, 0.0));
    node.set_transform(pose);
    pose
}

fn load_actor<L: ActorLoader>(loader: &mut L, config: &CentipedeConfig) -> Result<L::Actor, GameError> {
    let mut actor = loader.load_actor(&config.model)?;
    actor.loop_animation(&config.animation);
    Ok(actor)
}

fn spawn_actor<L: ActorLoader>(loader: &mut L, config: &CentipedeConfig) -> Result<L::Actor, GameError> {
    let mut actor = load_actor(loader, config)?;
    actor.attach_to_root();
    Ok(actor)
}

fn collision_sphere(
    name: &str,
    config: &CentipedeConfig,
    into_mask: CollisionMask,
    active: bool,
) -> CollisionSphere {
    CollisionSphere {
        name: name.to_string(),
        radius: config.collision_radius,
        into_mask,
        active,
    }
}
