//! High-level runner for placing prototype instances on a surface.
//!
//! A run pulls candidates one at a time from a [`CandidateSource`], poses the
//! prototype on each, and commits it only if its bounds do not touch any
//! instance committed earlier in the same run. Committed instances are final;
//! the run stops once the requested count is reached or the candidates run out.
use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bounds::BoundsIndex;
use crate::error::{Error, Result};
use crate::sampling::{
    CandidateSource, ConnectivitySequence, Draw, WeightedPointCloud, DEFAULT_FIELD_CUTOFF,
};
use crate::scatter::events::{EventSink, PlacementEvent, PlacementEventKind};
use crate::scatter::transform::build_pose;
use crate::scatter::{Instance, Prototype};
use crate::surface::field::ScalarField;
use crate::surface::Surface;

/// How candidates are chosen.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScatterMode {
    /// Uniform draws from a field-weighted point cloud.
    Random,
    /// Connectivity walk outward from the seed vertex.
    Clustered,
}

/// Configuration for a placement run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterConfig {
    /// Number of instances to place.
    pub count: usize,
    /// RNG seed in random mode; start vertex in clustered mode.
    pub seed: u64,
    /// Bias placement by the surface scalar field.
    pub use_field: bool,
    /// Align the prototype's up axis to vertex normals instead of `up_axis`.
    pub align_to_normal: bool,
    /// Inclusive field cutoff for candidacy.
    pub field_cutoff: f32,
    /// Prototype axis that gets aligned, and the fixed orientation otherwise.
    pub up_axis: Vec3,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            count: 1,
            seed: 0,
            use_field: false,
            align_to_normal: false,
            field_cutoff: DEFAULT_FIELD_CUTOFF,
            up_axis: Vec3::Z,
        }
    }
}

impl ScatterConfig {
    /// Creates a new [`ScatterConfig`] requesting `count` instances.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables field weighting.
    pub fn with_field(mut self, use_field: bool) -> Self {
        self.use_field = use_field;
        self
    }

    /// Enables or disables normal alignment.
    pub fn with_normal_alignment(mut self, align_to_normal: bool) -> Self {
        self.align_to_normal = align_to_normal;
        self
    }

    /// Sets the field cutoff.
    pub fn with_field_cutoff(mut self, field_cutoff: f32) -> Self {
        self.field_cutoff = field_cutoff;
        self
    }

    /// Sets the prototype up axis.
    pub fn with_up_axis(mut self, up_axis: Vec3) -> Self {
        self.up_axis = up_axis;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.field_cutoff.is_finite() || !(0.0..=1.0).contains(&self.field_cutoff) {
            return Err(Error::InvalidConfig(
                "field_cutoff must be finite and within [0, 1]".into(),
            ));
        }
        if !self.up_axis.is_finite() || self.up_axis.length_squared() == 0.0 {
            return Err(Error::InvalidConfig(
                "up_axis must be a finite, non-zero vector".into(),
            ));
        }

        Ok(())
    }

    /// Start vertex used by clustered runs.
    pub fn seed_vertex(&self) -> u32 {
        u32::try_from(self.seed).unwrap_or(u32::MAX)
    }
}

/// Result of a placement run.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Committed instances in placement order.
    pub instances: Vec<Instance>,
    /// Requested number of instances.
    pub requested: usize,
    /// Candidates taken out of the pool.
    pub candidates_drawn: usize,
    /// Candidates dropped by the stochastic weight test.
    pub skipped_by_weight: usize,
    /// Candidates whose bounds hit a committed instance.
    pub rejected_by_overlap: usize,
    /// True if the pool ran dry before the requested count was reached.
    pub exhausted: bool,
}

impl RunResult {
    /// Creates a new empty [`RunResult`].
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Default::default()
        }
    }

    /// Number of requested instances that could not be placed.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.instances.len())
    }
}

/// Placement session: configuration plus the surface and prototype it runs on.
///
/// Missing inputs are reported when a run starts, before any candidate work.
pub struct ScatterRunner<'a> {
    /// Run configuration applied to this runner.
    pub config: ScatterConfig,
    surface: Option<&'a Surface>,
    prototype: Option<&'a Prototype>,
}

impl<'a> ScatterRunner<'a> {
    pub fn new(config: ScatterConfig) -> Self {
        Self {
            config,
            surface: None,
            prototype: None,
        }
    }

    /// Creates a runner with both inputs set, validating the configuration.
    pub fn try_new(
        config: ScatterConfig,
        surface: &'a Surface,
        prototype: &'a Prototype,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config)
            .with_surface(surface)
            .with_prototype(prototype))
    }

    /// Sets the surface to place on.
    pub fn with_surface(mut self, surface: &'a Surface) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Sets the prototype to place.
    pub fn with_prototype(mut self, prototype: &'a Prototype) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Runs a placement in the given mode.
    pub fn run(&self, mode: ScatterMode) -> Result<RunResult> {
        self.run_with_events(mode, &mut ())
    }

    /// Runs a placement in the given mode, reporting progress to `sink`.
    pub fn run_with_events(
        &self,
        mode: ScatterMode,
        sink: &mut dyn EventSink,
    ) -> Result<RunResult> {
        let ctx = self.context()?;
        let config = &self.config;

        let field = if config.use_field {
            Some(ScalarField::from_surface(ctx.surface)?)
        } else {
            None
        };

        info!(
            "Starting {:?} placement of '{}' on '{}' | requested: {}.",
            mode,
            ctx.prototype.id,
            ctx.surface.name(),
            config.count,
        );

        let mut rng = StdRng::seed_from_u64(config.seed);
        let result = match mode {
            ScatterMode::Random => {
                let mut source = WeightedPointCloud::from_surface(
                    ctx.surface,
                    field.as_ref(),
                    config.field_cutoff,
                    config.align_to_normal,
                    config.up_axis,
                );
                place(&ctx, mode, &mut source, &mut rng, sink)
            }
            ScatterMode::Clustered => {
                let mut source = ConnectivitySequence::from_surface(
                    ctx.surface,
                    field.as_ref(),
                    config.field_cutoff,
                    config.seed_vertex(),
                    config.align_to_normal,
                    config.up_axis,
                );
                place(&ctx, mode, &mut source, &mut rng, sink)
            }
        };

        Ok(result)
    }

    fn context(&self) -> Result<PlacementContext<'_>> {
        self.config.validate()?;
        let surface = self.surface.ok_or(Error::MissingSurface)?;
        let prototype = self.prototype.ok_or(Error::MissingPrototype)?;
        if prototype.mesh.triangle_count() == 0 {
            return Err(Error::InvalidConfig(format!(
                "prototype '{}' has no triangles",
                prototype.id
            )));
        }
        Ok(PlacementContext {
            config: &self.config,
            surface,
            prototype,
        })
    }
}

/// Inputs of one run.
struct PlacementContext<'a> {
    config: &'a ScatterConfig,
    surface: &'a Surface,
    prototype: &'a Prototype,
}

fn place<S: CandidateSource>(
    ctx: &PlacementContext<'_>,
    mode: ScatterMode,
    source: &mut S,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> RunResult {
    let requested = ctx.config.count;
    if sink.wants(PlacementEventKind::RunStarted) {
        sink.send(PlacementEvent::RunStarted {
            mode,
            prototype_id: ctx.prototype.id.clone(),
            requested,
            candidates: source.remaining(),
        });
    }

    let mut result = RunResult::new(requested);
    let mut obstacles = BoundsIndex::with_capacity(requested.min(source.remaining()));
    let origin = ctx.surface.origin();

    while result.instances.len() < requested {
        let candidate = match source.draw(rng) {
            Draw::Exhausted => {
                result.exhausted = true;
                break;
            }
            Draw::Skipped { candidate, roll } => {
                result.candidates_drawn += 1;
                result.skipped_by_weight += 1;
                if sink.wants(PlacementEventKind::CandidateSkipped) {
                    sink.send(PlacementEvent::CandidateSkipped {
                        vertex: candidate.vertex,
                        weight: candidate.weight,
                        roll,
                    });
                }
                continue;
            }
            Draw::Ready(candidate) => candidate,
        };
        result.candidates_drawn += 1;

        let pose = build_pose(origin, &candidate, ctx.config.up_axis);
        let bounds = ctx.prototype.world_bounds(&pose);
        if obstacles.overlaps(&bounds) {
            result.rejected_by_overlap += 1;
            if sink.wants(PlacementEventKind::CandidateRejected) {
                sink.send(PlacementEvent::CandidateRejected {
                    vertex: candidate.vertex,
                    pose,
                });
            }
            continue;
        }

        let bounds = Arc::new(bounds);
        obstacles.commit(Arc::clone(&bounds));
        if sink.wants(PlacementEventKind::InstancePlaced) {
            sink.send(PlacementEvent::InstancePlaced {
                index: result.instances.len(),
                vertex: candidate.vertex,
                pose,
            });
        }
        result.instances.push(Instance {
            prototype_id: ctx.prototype.id.clone(),
            vertex: candidate.vertex,
            pose,
            bounds,
        });
    }

    debug!(
        "Drawn: {} | skipped: {} | rejected: {} | placed: {}.",
        result.candidates_drawn,
        result.skipped_by_weight,
        result.rejected_by_overlap,
        result.instances.len(),
    );

    if result.shortfall() > 0 {
        warn!(
            "Candidates on '{}' ran out after placing {} of {} instances.",
            ctx.surface.name(),
            result.instances.len(),
            requested,
        );
        if sink.wants(PlacementEventKind::Warning) {
            sink.send(PlacementEvent::Warning {
                context: format!(
                    "surface:{} prototype:{}",
                    ctx.surface.name(),
                    ctx.prototype.id
                ),
                message: format!(
                    "Placed {} of {} requested instances",
                    result.instances.len(),
                    requested
                ),
            });
        }
    } else {
        info!("Placed {} instances.", result.instances.len());
    }

    if sink.wants(PlacementEventKind::RunFinished) {
        sink.send(PlacementEvent::RunFinished {
            result: result.clone(),
        });
    }

    result
}

/// Places up to `count` copies of `prototype` at random surface vertices.
///
/// With `use_field`, only vertices at or above the field cutoff are
/// candidates and each is kept with probability equal to its field value.
pub fn place_random(
    surface: &Surface,
    prototype: &Prototype,
    count: usize,
    seed: u64,
    use_field: bool,
    align_to_normal: bool,
) -> Result<Vec<Instance>> {
    let config = ScatterConfig::new(count)
        .with_seed(seed)
        .with_field(use_field)
        .with_normal_alignment(align_to_normal);
    let runner = ScatterRunner::try_new(config, surface, prototype)?;
    Ok(runner.run(ScatterMode::Random)?.instances)
}

/// Places up to `count` copies of `prototype` by walking surface connectivity
/// outward from vertex `seed`.
///
/// With `use_field`, the walk is limited to vertices whose own value and whose
/// neighbors' values all meet the field cutoff.
pub fn place_clustered(
    surface: &Surface,
    prototype: &Prototype,
    count: usize,
    seed: u64,
    use_field: bool,
    align_to_normal: bool,
) -> Result<Vec<Instance>> {
    let config = ScatterConfig::new(count)
        .with_seed(seed)
        .with_field(use_field)
        .with_normal_alignment(align_to_normal);
    let runner = ScatterRunner::try_new(config, surface, prototype)?;
    Ok(runner.run(ScatterMode::Clustered)?.instances)
}
