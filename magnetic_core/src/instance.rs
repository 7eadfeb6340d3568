// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-binding effect state.

use kurbo::{Rect, Vec2};

use crate::config::EngineConfig;
use crate::motion::Motion;

/// Where an instance is in its measure/settle cycle.
///
/// ```text
///          measurement pass (hovering)
///   Idle ───────────────────────────────► Settling
///    ▲                                       │
///    └───────────────────────────────────────┘
///          mutation pass: offset settled
/// ```
///
/// Only `Idle` instances are remeasured. A `Settling` instance keeps its last
/// rectangles: its own motion is a transform and does not move layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MotionPhase {
    /// Eligible for remeasurement; no transform is applied.
    #[default]
    Idle,
    /// Measured or visibly displaced; integrating only.
    Settling,
}

/// Rectangles captured by the most recent measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceGeometry {
    /// Container bounds in viewport coordinates.
    pub container: Rect,
    /// Element bounds in viewport coordinates, without any applied offset.
    pub element: Rect,
}

/// Options accepted by [`Engine::create`](crate::engine::Engine::create).
///
/// `container` and `element` are required; leaving either as `None` fails
/// construction. `force` and `distance` fall back to the engine defaults
/// when `None` or NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct MagnetOptions<N> {
    /// Node whose hover state gates the effect and whose bounds shape the
    /// field.
    pub container: Option<N>,
    /// Node that is displaced.
    pub element: Option<N>,
    /// Smoothing coefficient, clamped to `[0, 0.999]`.
    pub force: Option<f64>,
    /// Displacement multiplier.
    pub distance: Option<f64>,
}

impl<N> Default for MagnetOptions<N> {
    fn default() -> Self {
        Self {
            container: None,
            element: None,
            force: None,
            distance: None,
        }
    }
}

impl<N> MagnetOptions<N> {
    /// Options binding `element` to `container` with default tuning.
    #[must_use]
    pub fn new(container: N, element: N) -> Self {
        Self {
            container: Some(container),
            element: Some(element),
            force: None,
            distance: None,
        }
    }

    /// Sets the smoothing coefficient.
    #[must_use]
    pub fn with_force(mut self, force: f64) -> Self {
        self.force = Some(force);
        self
    }

    /// Sets the displacement multiplier.
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// One binding between a container and a displaced element.
#[derive(Clone, Debug)]
pub struct Instance<N> {
    container: N,
    element: N,
    force: f64,
    distance: f64,
    hovering: bool,
    phase: MotionPhase,
    geometry: Option<InstanceGeometry>,
    motion: Motion,
}

impl<N> Instance<N> {
    /// Creates an idle, unhovered instance with normalized parameters.
    #[must_use]
    pub fn new(
        container: N,
        element: N,
        force: Option<f64>,
        distance: Option<f64>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            container,
            element,
            force: config.normalize_force(force),
            distance: config.normalize_distance(distance),
            hovering: false,
            phase: MotionPhase::Idle,
            geometry: None,
            motion: Motion::REST,
        }
    }

    /// The reference node.
    #[must_use]
    pub fn container(&self) -> &N {
        &self.container
    }

    /// The displaced node.
    #[must_use]
    pub fn element(&self) -> &N {
        &self.element
    }

    /// Effective smoothing coefficient.
    #[must_use]
    pub fn force(&self) -> f64 {
        self.force
    }

    /// Effective displacement multiplier.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Whether the pointer is inside the container.
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Current measure/settle phase.
    #[must_use]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Rectangles from the last measurement, if any.
    #[must_use]
    pub fn geometry(&self) -> Option<InstanceGeometry> {
        self.geometry
    }

    /// Offset currently applied to the element.
    #[must_use]
    pub fn rendered(&self) -> Vec2 {
        self.motion.rendered()
    }

    /// Re-normalizes and stores a new smoothing coefficient.
    pub fn set_force(&mut self, force: Option<f64>, config: &EngineConfig) {
        self.force = config.normalize_force(force);
    }

    /// Re-normalizes and stores a new displacement multiplier.
    pub fn set_distance(&mut self, distance: Option<f64>, config: &EngineConfig) {
        self.distance = config.normalize_distance(distance);
    }

    pub(crate) fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    /// `true` when the measurement pass should refresh this instance.
    pub(crate) fn wants_measure(&self) -> bool {
        self.hovering && self.phase == MotionPhase::Idle
    }

    /// `true` when integrating would not change anything.
    pub(crate) fn is_quiescent(&self) -> bool {
        !self.hovering && self.phase == MotionPhase::Idle && self.motion.is_at_rest()
    }

    pub(crate) fn store_geometry(&mut self, geometry: InstanceGeometry) {
        self.geometry = Some(geometry);
        self.phase = MotionPhase::Settling;
    }

    pub(crate) fn set_phase(&mut self, phase: MotionPhase) {
        self.phase = phase;
    }

    pub(crate) fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }
}
