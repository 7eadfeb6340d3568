// Copyright 2026 the Magnetic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration API and the per-frame driver.
//!
//! [`Engine::frame`] runs two passes over the registry, in registration
//! order:
//!
//! 1. **Measure.** Every hovering [`Idle`](MotionPhase::Idle) instance reads
//!    its container rectangle (through the per-frame [`GeometryCache`]) and
//!    its element rectangle, then moves to
//!    [`Settling`](MotionPhase::Settling).
//! 2. **Mutate.** Every instance computes its raw displacement from the
//!    frame's pointer sample, steps its integrator, and either writes the
//!    offset or, once settled, clears it and returns to `Idle`.
//!
//! Both passes complete synchronously. Hover and pointer updates that arrive
//! between frames are plain overwrites observed by the next frame.

use kurbo::Vec2;

use crate::backend::Presenter;
use crate::config::EngineConfig;
use crate::error::CreateError;
use crate::field;
use crate::geometry::GeometryCache;
use crate::instance::{Instance, InstanceGeometry, MagnetOptions, MotionPhase};
use crate::motion::Step;
use crate::pointer::PointerSource;
use crate::registry::{InstanceId, Registry};
use crate::timing::FrameTick;
use crate::trace::{
    FrameSummary, FrameTickEvent, MeasureEvent, RegisterEvent, SettleEvent, Tracer,
    UnregisterEvent,
};

/// Counters gathered during one [`Engine::frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Live instances at the start of the frame.
    pub instances: u32,
    /// Instances whose rectangles were refreshed.
    pub measured: u32,
    /// Container rectangles read from the presenter.
    pub container_queries: u32,
    /// Container rectangles served from the per-frame cache.
    pub cache_hits: u32,
    /// Instances whose offset was written.
    pub moving: u32,
    /// Instances whose transform was cleared.
    pub settled: u32,
    /// Instances skipped because integrating them was a no-op.
    pub skipped: u32,
}

/// Owns the registry and drives the effect.
///
/// `N` is the host node handle and `P` supplies the pointer position.
#[derive(Debug)]
pub struct Engine<N, P> {
    config: EngineConfig,
    registry: Registry<N>,
    cache: GeometryCache<N>,
    pointer: P,
}

impl<N: Clone + PartialEq, P: PointerSource> Engine<N, P> {
    /// Creates an engine with [`EngineConfig::DEFAULT`].
    #[must_use]
    pub fn new(pointer: P) -> Self {
        Self::with_config(pointer, EngineConfig::DEFAULT)
    }

    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn with_config(pointer: P, config: EngineConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            cache: GeometryCache::new(),
            pointer,
        }
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The pointer provider.
    #[must_use]
    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    /// Validates `options`, prepares the element, and registers a new
    /// instance.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::InvalidContainer`] if `options.container` is
    /// `None`, otherwise [`CreateError::InvalidElement`] if `options.element`
    /// is `None`. Nothing is registered and `presenter` is not touched on
    /// failure.
    pub fn create<R>(
        &mut self,
        options: MagnetOptions<N>,
        presenter: &mut R,
        tracer: &mut Tracer<'_>,
    ) -> Result<InstanceId, CreateError>
    where
        R: Presenter<Node = N>,
    {
        let container = options.container.ok_or(CreateError::InvalidContainer)?;
        let element = options.element.ok_or(CreateError::InvalidElement)?;

        presenter.prepare_element(&element);

        let instance = Instance::new(
            container,
            element,
            options.force,
            options.distance,
            &self.config,
        );
        let (force, distance) = (instance.force(), instance.distance());
        let id = self.registry.register(instance);
        tracer.register(&RegisterEvent {
            instance: id,
            force,
            distance,
        });
        Ok(id)
    }

    /// Removes an instance. Any offset it still applies is cleared.
    ///
    /// Returns `None` if `id` is stale.
    pub fn unregister<R>(
        &mut self,
        id: InstanceId,
        presenter: &mut R,
        tracer: &mut Tracer<'_>,
    ) -> Option<Instance<N>>
    where
        R: Presenter<Node = N>,
    {
        let instance = self.registry.unregister(id)?;
        if instance.phase() == MotionPhase::Settling {
            presenter.clear(instance.element());
        }
        tracer.unregister(&UnregisterEvent { instance: id });
        Some(instance)
    }

    /// Records a container enter (`true`) or leave (`false`).
    ///
    /// Returns `false` if `id` is stale.
    pub fn set_hovering(&mut self, id: InstanceId, hovering: bool) -> bool {
        match self.registry.get_mut(id) {
            Some(inst) => {
                inst.set_hovering(hovering);
                true
            }
            None => false,
        }
    }

    /// Updates an instance's smoothing coefficient (normalized like at
    /// construction). Returns `false` if `id` is stale.
    pub fn set_force(&mut self, id: InstanceId, force: Option<f64>) -> bool {
        let Some(inst) = self.registry.get_mut(id) else {
            return false;
        };
        inst.set_force(force, &self.config);
        true
    }

    /// Updates an instance's displacement multiplier (normalized like at
    /// construction). Returns `false` if `id` is stale.
    pub fn set_distance(&mut self, id: InstanceId, distance: Option<f64>) -> bool {
        let Some(inst) = self.registry.get_mut(id) else {
            return false;
        };
        inst.set_distance(distance, &self.config);
        true
    }

    /// Returns the live instance for `id`.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&Instance<N>> {
        self.registry.get(id)
    }

    /// Live instances in registration order.
    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &Instance<N>)> {
        self.registry.iter()
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no instance is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Runs the measurement pass and the mutation pass for one frame.
    pub fn frame<R>(
        &mut self,
        tick: &FrameTick,
        presenter: &mut R,
        tracer: &mut Tracer<'_>,
    ) -> FrameStats
    where
        R: Presenter<Node = N>,
    {
        let pointer = self.pointer.pointer();
        let instances = u32::try_from(self.registry.len()).unwrap_or(u32::MAX);
        tracer.frame_tick(&FrameTickEvent::new(tick, pointer, instances));

        let mut stats = FrameStats {
            instances,
            ..FrameStats::default()
        };

        // -- measure -------------------------------------------------------
        self.cache.clear();
        for (id, inst) in self.registry.iter_mut() {
            if !inst.wants_measure() {
                continue;
            }
            let (container, container_cached) = self
                .cache
                .get_or_measure(inst.container(), |node| presenter.measure(node));
            let element = presenter.measure(inst.element());
            inst.store_geometry(InstanceGeometry { container, element });

            stats.measured += 1;
            tracer.measure(&MeasureEvent {
                frame_index: tick.frame_index,
                instance: id,
                container_cached,
            });
        }
        stats.container_queries = self.cache.misses();
        stats.cache_hits = self.cache.hits();

        // -- mutate --------------------------------------------------------
        let threshold = self.config.settle_threshold;
        for (id, inst) in self.registry.iter_mut() {
            if inst.is_quiescent() {
                stats.skipped += 1;
                continue;
            }

            let raw = match (inst.is_hovering(), inst.geometry()) {
                (true, Some(g)) => {
                    field::displacement(pointer, g.element, g.container, inst.distance())
                }
                _ => Vec2::ZERO,
            };

            let force = inst.force();
            match inst.motion_mut().step(raw, force, threshold) {
                Step::Moving(offset) => {
                    presenter.translate(inst.element(), offset);
                    inst.set_phase(MotionPhase::Settling);
                    stats.moving += 1;

                    #[cfg(feature = "trace-rich")]
                    tracer.offset(&crate::trace::OffsetEvent {
                        frame_index: tick.frame_index,
                        instance: id,
                        x: offset.x,
                        y: offset.y,
                    });
                }
                Step::Settled => {
                    if inst.phase() == MotionPhase::Settling {
                        presenter.clear(inst.element());
                        stats.settled += 1;
                        tracer.settle(&SettleEvent {
                            frame_index: tick.frame_index,
                            instance: id,
                        });
                    }
                    inst.set_phase(MotionPhase::Idle);
                }
            }
        }

        tracer.frame_summary(&FrameSummary::new(tick, stats));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::PointerCell;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use kurbo::{Point, Rect};

    const ROOT: u32 = 1;
    const EL: u32 = 10;
    const EL2: u32 = 11;

    #[derive(Debug, Default)]
    struct MockPresenter {
        rects: Vec<(u32, Rect)>,
        measured: Vec<u32>,
        translated: Vec<(u32, Vec2)>,
        cleared: Vec<u32>,
        prepared: Vec<u32>,
    }

    impl MockPresenter {
        fn scene() -> Self {
            Self {
                rects: alloc::vec![
                    (ROOT, Rect::new(0.0, 0.0, 200.0, 100.0)),
                    (EL, Rect::new(80.0, 40.0, 120.0, 60.0)),
                    (EL2, Rect::new(20.0, 20.0, 40.0, 40.0)),
                ],
                ..Self::default()
            }
        }

        fn measure_count(&self, node: u32) -> usize {
            self.measured.iter().filter(|&&n| n == node).count()
        }
    }

    impl Presenter for MockPresenter {
        type Node = u32;

        fn measure(&mut self, node: &u32) -> Rect {
            self.measured.push(*node);
            self.rects
                .iter()
                .find(|(n, _)| n == node)
                .map_or(Rect::ZERO, |(_, r)| *r)
        }

        fn translate(&mut self, node: &u32, offset: Vec2) {
            self.translated.push((*node, offset));
        }

        fn clear(&mut self, node: &u32) {
            self.cleared.push(*node);
        }

        fn prepare_element(&mut self, node: &u32) {
            self.prepared.push(*node);
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        let d = a - b;
        -1e-9 < d && d < 1e-9
    }

    fn tick(i: u64) -> FrameTick {
        FrameTick::new(i, i as f64 * 16.0)
    }

    fn hovered_engine(pointer: Point) -> (Engine<u32, Point>, MockPresenter, InstanceId) {
        let mut engine = Engine::new(pointer);
        let mut presenter = MockPresenter::scene();
        let id = engine
            .create(MagnetOptions::new(ROOT, EL), &mut presenter, &mut Tracer::none())
            .unwrap();
        assert!(engine.set_hovering(id, true));
        (engine, presenter, id)
    }

    #[test]
    fn first_frame_matches_worked_example() {
        let (mut engine, mut presenter, id) = hovered_engine(Point::new(150.0, 50.0));

        let stats = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());

        let inst = engine.instance(id).unwrap();
        assert!(approx(inst.rendered().x, 4.0), "got {:?}", inst.rendered());
        assert_eq!(inst.rendered().y, 0.0);
        assert_eq!(inst.phase(), MotionPhase::Settling);
        assert_eq!(presenter.translated.len(), 1);
        assert_eq!(presenter.translated[0].0, EL);
        assert_eq!((stats.measured, stats.moving), (1, 1));
    }

    #[test]
    fn create_rejects_missing_container_first() {
        let mut engine: Engine<u32, Point> = Engine::new(Point::ORIGIN);
        let mut presenter = MockPresenter::scene();

        let err = engine.create(MagnetOptions::default(), &mut presenter, &mut Tracer::none());
        assert_eq!(err, Err(CreateError::InvalidContainer));

        let only_container = MagnetOptions {
            container: Some(ROOT),
            ..MagnetOptions::default()
        };
        let err = engine.create(only_container, &mut presenter, &mut Tracer::none());
        assert_eq!(err, Err(CreateError::InvalidElement));

        assert!(engine.is_empty(), "failed construction registers nothing");
        assert!(presenter.prepared.is_empty(), "failed construction touches nothing");
    }

    #[test]
    fn create_normalizes_and_prepares() {
        let mut engine: Engine<u32, Point> = Engine::new(Point::ORIGIN);
        let mut presenter = MockPresenter::scene();
        let opts = MagnetOptions::new(ROOT, EL)
            .with_force(1.0)
            .with_distance(f64::NAN);
        let id = engine.create(opts, &mut presenter, &mut Tracer::none()).unwrap();

        let inst = engine.instance(id).unwrap();
        assert_eq!(inst.force(), 0.999);
        assert_eq!(inst.distance(), 1.0);
        assert_eq!(presenter.prepared, [EL]);
    }

    #[test]
    fn unhovered_instances_are_left_alone() {
        let mut engine = Engine::new(Point::new(150.0, 50.0));
        let mut presenter = MockPresenter::scene();
        let _ = engine
            .create(MagnetOptions::new(ROOT, EL), &mut presenter, &mut Tracer::none())
            .unwrap();

        let stats = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());
        assert!(presenter.measured.is_empty());
        assert!(presenter.translated.is_empty());
        assert!(presenter.cleared.is_empty());
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn shared_container_is_measured_once_per_frame() {
        let mut engine = Engine::new(Point::new(150.0, 50.0));
        let mut presenter = MockPresenter::scene();
        for el in [EL, EL2] {
            let id = engine
                .create(MagnetOptions::new(ROOT, el), &mut presenter, &mut Tracer::none())
                .unwrap();
            engine.set_hovering(id, true);
        }

        let stats = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());
        assert_eq!(presenter.measure_count(ROOT), 1);
        assert_eq!(presenter.measure_count(EL), 1);
        assert_eq!(presenter.measure_count(EL2), 1);
        assert_eq!((stats.container_queries, stats.cache_hits), (1, 1));
    }

    #[test]
    fn settling_instance_reuses_its_rectangles() {
        let (mut engine, mut presenter, _) = hovered_engine(Point::new(150.0, 50.0));
        let _ = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());
        let _ = engine.frame(&tick(1), &mut presenter, &mut Tracer::none());
        assert_eq!(presenter.measure_count(EL), 1, "second frame must not remeasure");
        assert_eq!(presenter.translated.len(), 2);
    }

    #[test]
    fn pointer_at_center_settles_and_remeasures() {
        let (mut engine, mut presenter, id) = hovered_engine(Point::new(100.0, 50.0));

        let _ = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());
        assert_eq!(engine.instance(id).unwrap().rendered(), Vec2::ZERO);
        assert_eq!(presenter.cleared, [EL], "measured instance clears on settle");
        assert_eq!(engine.instance(id).unwrap().phase(), MotionPhase::Idle);

        let _ = engine.frame(&tick(1), &mut presenter, &mut Tracer::none());
        assert_eq!(presenter.measure_count(EL), 2, "idle hovering instance remeasures");
        assert!(presenter.translated.is_empty());
    }

    #[test]
    fn leaving_decays_then_clears_once() {
        let (mut engine, mut presenter, id) = hovered_engine(Point::new(150.0, 50.0));
        for i in 0..30 {
            let _ = engine.frame(&tick(i), &mut presenter, &mut Tracer::none());
        }
        engine.set_hovering(id, false);

        let mut frame = 30;
        while presenter.cleared.is_empty() {
            let _ = engine.frame(&tick(frame), &mut presenter, &mut Tracer::none());
            frame += 1;
            assert!(frame < 1_000, "offset never settled");
        }
        let writes = presenter.translated.len();
        for i in 0..20 {
            let _ = engine.frame(&tick(frame + i), &mut presenter, &mut Tracer::none());
        }

        let inst = engine.instance(id).unwrap();
        assert_eq!(inst.phase(), MotionPhase::Idle);
        assert_eq!(presenter.cleared, [EL], "cleared exactly once");
        assert_eq!(presenter.translated.len(), writes, "no writes after settling");
        assert_eq!(presenter.measure_count(EL), 1, "never remeasured while away");
    }

    #[test]
    fn pointer_updates_are_seen_next_frame() {
        let cell = Rc::new(PointerCell::at(Point::new(100.0, 50.0)));
        let mut engine = Engine::new(Rc::clone(&cell));
        let mut presenter = MockPresenter::scene();
        let id = engine
            .create(MagnetOptions::new(ROOT, EL), &mut presenter, &mut Tracer::none())
            .unwrap();
        engine.set_hovering(id, true);

        let _ = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());
        assert_eq!(engine.instance(id).unwrap().rendered(), Vec2::ZERO);

        cell.set(Point::new(150.0, 50.0));
        let _ = engine.frame(&tick(1), &mut presenter, &mut Tracer::none());
        assert!(approx(engine.instance(id).unwrap().rendered().x, 4.0));
    }

    #[test]
    fn negative_distance_repels() {
        let mut engine = Engine::new(Point::new(150.0, 50.0));
        let mut presenter = MockPresenter::scene();
        let id = engine
            .create(
                MagnetOptions::new(ROOT, EL).with_distance(-1.0),
                &mut presenter,
                &mut Tracer::none(),
            )
            .unwrap();
        engine.set_hovering(id, true);
        let _ = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());
        assert!(approx(engine.instance(id).unwrap().rendered().x, -4.0));
    }

    #[test]
    fn unregister_clears_a_displaced_element() {
        let (mut engine, mut presenter, id) = hovered_engine(Point::new(150.0, 50.0));
        let _ = engine.frame(&tick(0), &mut presenter, &mut Tracer::none());

        assert!(engine.unregister(id, &mut presenter, &mut Tracer::none()).is_some());
        assert_eq!(presenter.cleared, [EL]);
        assert!(!engine.set_hovering(id, true), "stale handle");
        assert!(!engine.set_force(id, Some(0.5)), "stale handle");

        let stats = engine.frame(&tick(1), &mut presenter, &mut Tracer::none());
        assert_eq!(stats.instances, 0);
        assert_eq!(presenter.translated.len(), 1);
    }

    #[test]
    fn infinite_distance_leaves_no_stray_transform() {
        let mut engine = Engine::new(Point::new(150.0, 50.0));
        let mut presenter = MockPresenter::scene();
        let distance = crate::config::coerce_number("Infinity");
        let id = engine
            .create(
                MagnetOptions::new(ROOT, EL).with_distance(distance),
                &mut presenter,
                &mut Tracer::none(),
            )
            .unwrap();
        engine.set_hovering(id, true);
        for i in 0..5 {
            let _ = engine.frame(&tick(i), &mut presenter, &mut Tracer::none());
        }
        engine.set_hovering(id, false);
        for i in 5..10 {
            let _ = engine.frame(&tick(i), &mut presenter, &mut Tracer::none());
        }

        let inst = engine.instance(id).unwrap();
        assert_eq!(inst.rendered(), Vec2::ZERO);
        assert_eq!(inst.phase(), MotionPhase::Idle);
        assert!(presenter.translated.is_empty(), "no transform ever written");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn settle_is_reported_once_per_clear() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Settles(Vec<(u64, InstanceId)>);
        impl TraceSink for Settles {
            fn on_settle(&mut self, e: &SettleEvent) {
                self.0.push((e.frame_index, e.instance));
            }
        }

        let (mut engine, mut presenter, id) = hovered_engine(Point::new(150.0, 50.0));
        let mut settles = Settles::default();
        for i in 0..10 {
            let _ = engine.frame(&tick(i), &mut presenter, &mut Tracer::new(&mut settles));
        }
        engine.set_hovering(id, false);
        for i in 10..400 {
            let _ = engine.frame(&tick(i), &mut presenter, &mut Tracer::new(&mut settles));
        }

        assert_eq!(presenter.cleared, [EL]);
        assert_eq!(settles.0.len(), 1, "got {:?}", settles.0);
        assert_eq!(settles.0[0].1, id);
    }

    #[test]
    fn setters_renormalize_live_instances() {
        let (mut engine, _, id) = hovered_engine(Point::ORIGIN);
        assert!(engine.set_force(id, Some(-3.0)));
        assert!(engine.set_distance(id, None));
        let inst = engine.instance(id).unwrap();
        assert_eq!((inst.force(), inst.distance()), (0.0, 1.0));
    }
}
