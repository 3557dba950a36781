//! The scene itself: selection, upload, mesh, light, view, and dust in one
//! place, advanced once per frame.
//!
//! [`SceneState::update`] runs a fixed phase order: apply queued commands,
//! drain finished decodes, rebuild the mesh if inputs changed, then advance
//! the light show, view easing, and particle drift. The render host reads
//! the result and draws exactly once per update.

use litho_catalog::{Catalog, Product, ProductId, Variant, VariantId};
use litho_mesh::{GeometryError, LithoMesh, ProductKind};
use litho_raster::LuminanceGrid;
use litho_shading::LightColor;

use crate::command::Command;
use crate::decode::{DecodePipeline, DecodeSource};
use crate::particles::ParticleField;
use crate::transition::LightTransition;
use crate::view::ViewState;

/// Seed for the default dust cloud; fixed so identical runs render
/// identical clouds.
const DEFAULT_PARTICLE_SEED: u64 = 42;

/// Scene behavior knobs, filled in from the config file by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneOptions {
    /// Scale view easing and particle drift by elapsed frame time instead
    /// of stepping a fixed amount per frame.
    pub frame_rate_independent_easing: bool,
    /// Backlight color until the user picks another one.
    pub light_color: LightColor,
    /// Whether the lamp starts switched on.
    pub light_on: bool,
    /// Seed for ambient particle placement.
    pub particle_seed: u64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            frame_rate_independent_easing: false,
            light_color: LightColor::Warm,
            light_on: true,
            particle_seed: DEFAULT_PARTICLE_SEED,
        }
    }
}

/// What a mesh rebuild attempt did.
#[derive(Debug)]
pub enum RebuildOutcome {
    /// A fresh mesh replaced the previous one.
    Rebuilt(ProductKind),
    /// No image or no product selected; nothing to preview and nothing
    /// went wrong.
    NothingToBuild,
    /// The build failed; the previous mesh stays live.
    Failed(GeometryError),
}

/// All mutable preview state, with [`SceneState::update`] as its only
/// writer.
///
/// Input adapters queue [`Command`]s; decode results arrive through the
/// [`DecodePipeline`]. Both are consumed at the start of `update`, so the
/// mesh, light, and view can never change mid-frame.
pub struct SceneState {
    catalog: Catalog,
    product_id: Option<ProductId>,
    variant_id: Option<VariantId>,
    /// The color the user picked; multicolor products pin the effective
    /// color to [`LightColor::Multi`] while selected.
    preferred_color: LightColor,
    lamp_on: bool,
    transition: LightTransition,
    view: ViewState,
    particles: ParticleField,
    decode: DecodePipeline,
    grid: Option<LuminanceGrid>,
    mesh: Option<LithoMesh>,
    /// Bumped on every mesh replace or drop; the render host re-uploads
    /// buffers when it sees a version it has not drawn yet.
    mesh_version: u64,
    needs_rebuild: bool,
    commands: Vec<Command>,
    options: SceneOptions,
}

impl SceneState {
    /// Creates a scene over the given catalog with the first product and
    /// its first variant preselected.
    pub fn new(catalog: Catalog, options: SceneOptions) -> Self {
        let product_id = catalog.products().first().map(|p| p.id);
        let variant_id = catalog
            .products()
            .first()
            .and_then(|p| p.variants.first())
            .map(|v| v.id);
        let transition = if options.light_on {
            LightTransition::full()
        } else {
            LightTransition::dark()
        };

        Self {
            catalog,
            product_id,
            variant_id,
            preferred_color: options.light_color,
            lamp_on: options.light_on,
            transition,
            view: ViewState::new(),
            particles: ParticleField::new(options.particle_seed),
            decode: DecodePipeline::new(),
            grid: None,
            mesh: None,
            mesh_version: 0,
            needs_rebuild: false,
            commands: Vec::new(),
            options,
        }
    }

    /// Queues a command for the next update step.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Advances the scene by one frame.
    ///
    /// Returns the rebuild outcome if a rebuild was attempted this frame,
    /// `None` otherwise.
    pub fn update(&mut self, dt: f32) -> Option<RebuildOutcome> {
        for command in std::mem::take(&mut self.commands) {
            self.apply(command);
        }

        for result in self.decode.drain() {
            if result.generation != self.decode.current_generation() {
                log::debug!("discarding stale decode (generation {})", result.generation);
                continue;
            }
            match result.outcome {
                Ok(image) => {
                    let grid = LuminanceGrid::from_image(&image);
                    log::info!(
                        "upload ready: {}x{} px -> {}x{} grid",
                        image.width(),
                        image.height(),
                        grid.width(),
                        grid.height()
                    );
                    self.grid = Some(grid);
                    self.needs_rebuild = true;
                }
                Err(error) => log::warn!("upload rejected: {error}"),
            }
        }

        let outcome = if self.needs_rebuild {
            self.needs_rebuild = false;
            let outcome = self.rebuild();
            // The reveal: a fresh mesh appears dark, then the backlight
            // fades in. Skipped while the lamp is switched off.
            if matches!(outcome, RebuildOutcome::Rebuilt(_)) && self.lamp_on {
                self.transition.trigger();
            }
            Some(outcome)
        } else {
            None
        };

        self.transition.advance(dt);

        if self.options.frame_rate_independent_easing {
            self.view.step_scaled(dt);
            self.particles.step_scaled(dt);
        } else {
            self.view.step();
            self.particles.step(dt);
        }

        outcome
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SelectProduct(id) => {
                if self.product_id == Some(id) {
                    return;
                }
                match self.catalog.get(id) {
                    Some(product) => {
                        log::info!("product -> {}", product.name);
                        let first_variant = product.variants.first().map(|v| v.id);
                        self.product_id = Some(id);
                        self.variant_id = first_variant;
                        self.needs_rebuild = true;
                    }
                    None => log::warn!("unknown product id {}", id.0),
                }
            }
            Command::SelectVariant(id) => {
                let Some((product, variant)) = self.catalog.variant(id) else {
                    log::warn!("unknown variant id {}", id.0);
                    return;
                };
                let owner = product.id;
                log::info!("size -> {} ({})", variant.size_cm(), variant.price_label());
                if self.product_id == Some(owner) {
                    // Same geometry, new size: transform only, no rebuild.
                    self.variant_id = Some(id);
                } else {
                    self.product_id = Some(owner);
                    self.variant_id = Some(id);
                    self.needs_rebuild = true;
                }
            }
            Command::SetLightColor(color) => {
                if self.selection_is_multicolor() {
                    log::debug!("multicolor product pins the preview color");
                } else {
                    self.preferred_color = color;
                }
            }
            Command::SetLightOn(on) => {
                if on && !self.lamp_on {
                    self.lamp_on = true;
                    self.transition.trigger();
                } else if !on && self.lamp_on {
                    self.lamp_on = false;
                    self.transition.extinguish();
                }
            }
            Command::LoadImage(path) => {
                log::info!("upload: {}", path.display());
                self.decode.submit(DecodeSource::Path(path));
            }
            Command::ClearImage => {
                self.decode.invalidate();
                self.grid = None;
                self.needs_rebuild = false;
                if self.mesh.take().is_some() {
                    self.mesh_version += 1;
                }
            }
            Command::Orbit { yaw, pitch } => self.view.orbit(yaw, pitch),
            Command::Zoom(delta) => self.view.zoom_by(delta),
            Command::ResetView => self.view.reset(),
        }
    }

    /// Builds a fresh mesh from the current grid and product selection,
    /// replacing the previous mesh atomically on success.
    fn rebuild(&mut self) -> RebuildOutcome {
        let Some(product) = self.product_id.and_then(|id| self.catalog.get(id)) else {
            return RebuildOutcome::NothingToBuild;
        };
        let kind = match product.kind() {
            Ok(kind) => kind,
            Err(error) => {
                log::error!("mesh rebuild failed: {error}");
                return RebuildOutcome::Failed(error);
            }
        };
        let Some(grid) = &self.grid else {
            return RebuildOutcome::NothingToBuild;
        };

        let mesh = kind.build(grid);
        log::info!(
            "built {kind} mesh: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        self.mesh = Some(mesh);
        self.mesh_version += 1;
        RebuildOutcome::Rebuilt(kind)
    }

    fn selection_is_multicolor(&self) -> bool {
        self.product_id
            .and_then(|id| self.catalog.get(id))
            .is_some_and(|p| p.multicolor)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn variant_id(&self) -> Option<VariantId> {
        self.variant_id
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.product_id.and_then(|id| self.catalog.get(id))
    }

    pub fn selected_variant(&self) -> Option<&Variant> {
        self.variant_id
            .and_then(|id| self.catalog.variant(id))
            .map(|(_, variant)| variant)
    }

    /// Uniform mesh scale from the selected variant's size, 1.0 if no
    /// variant is selected.
    pub fn scale(&self) -> f32 {
        self.selected_variant().map(|v| v.scale()).unwrap_or(1.0)
    }

    /// Effective backlight color; multicolor products pin this to
    /// [`LightColor::Multi`] while selected.
    pub fn light_color(&self) -> LightColor {
        if self.selection_is_multicolor() {
            LightColor::Multi
        } else {
            self.preferred_color
        }
    }

    pub fn lamp_on(&self) -> bool {
        self.lamp_on
    }

    /// Backlight intensity in [0, 1] for the shader.
    pub fn light_level(&self) -> f32 {
        self.transition.level()
    }

    /// `true` while the fade-in show is delaying or ramping.
    pub fn light_show_active(&self) -> bool {
        self.transition.is_active()
    }

    pub fn grid(&self) -> Option<&LuminanceGrid> {
        self.grid.as_ref()
    }

    pub fn mesh(&self) -> Option<&LithoMesh> {
        self.mesh.as_ref()
    }

    /// Bumped on every mesh replace or drop.
    pub fn mesh_version(&self) -> u64 {
        self.mesh_version
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }
}
