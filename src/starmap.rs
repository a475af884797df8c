//! # StarMap: the chart pipeline façade
//!
//! [`StarMap`] wires the pipeline stages together:
//!
//! 1. **Catalog**: loaded once through the injected [`CatalogLoader`], then shared
//!    read-only for every render.
//! 2. **Ephemeris**: a JPL kernel opened once from an [`EphemFileSource`] (or any
//!    injected [`EphemerisProvider`]).
//! 3. **Per render**: observer frame → apparent positions → zenith stereographic
//!    projection → chart.
//!
//! Both caches use [`OnceCell`]: the first successful load is kept, a failed one is
//! retried on the next render. Nothing else is stored between renders, so a
//! [`StarMap`] can serve overlapping requests from several threads.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use starmap::{observers::Observer, starmap::StarMap, time::now_utc};
//!
//! let starmap = StarMap::builder().build().unwrap();
//! let outcome = starmap.plot_sky(&now_utc().unwrap(), &Observer::default_site());
//! if let Some(chart) = outcome.chart() {
//!     std::fs::write("starmap.svg", chart.to_svg(800).unwrap()).unwrap();
//! }
//! ```
use std::{fmt, str::FromStr, sync::Arc};

use hifitime::Epoch;
use once_cell::sync::OnceCell;
use tracing::{debug, error, info};

use crate::{
    apparent::apparent_positions,
    catalog::{
        hipparcos::{CatalogSource, HipparcosLoader},
        CatalogLoader, StarCatalog,
    },
    chart::{render, ChartParams, SkyChart},
    constants::DEFAULT_EPHEMERIS,
    env_state::StarMapEnv,
    jpl_ephem::{download_jpl_file::EphemFileSource, EphemerisProvider},
    observers::{observer_frame::ObserverFrame, Observer},
    projection::StereographicProjection,
    starmap_errors::StarMapError,
};

/// Result of [`StarMap::plot_sky`]: a chart, or the message to show instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Rendered(SkyChart),
    Failed { message: String },
}

impl ChartOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, ChartOutcome::Rendered(_))
    }

    pub fn chart(&self) -> Option<&SkyChart> {
        match self {
            ChartOutcome::Rendered(chart) => Some(chart),
            ChartOutcome::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ChartOutcome::Rendered(_) => None,
            ChartOutcome::Failed { message } => Some(message),
        }
    }
}

impl From<Result<SkyChart, StarMapError>> for ChartOutcome {
    fn from(result: Result<SkyChart, StarMapError>) -> Self {
        match result {
            Ok(chart) => ChartOutcome::Rendered(chart),
            Err(e) => ChartOutcome::Failed {
                message: format!("could not render sky chart: {e}"),
            },
        }
    }
}

pub struct StarMap {
    env: StarMapEnv,
    catalog_loader: Arc<dyn CatalogLoader>,
    catalog: OnceCell<StarCatalog>,
    jpl_source: EphemFileSource,
    ephemeris: OnceCell<Arc<dyn EphemerisProvider>>,
    params: ChartParams,
    projection: StereographicProjection,
}

impl fmt::Debug for StarMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarMap")
            .field("env", &self.env)
            .field("catalog_loaded", &self.catalog.get().map(StarCatalog::len))
            .field("jpl_source", &self.jpl_source)
            .field("ephemeris_loaded", &self.ephemeris.get().is_some())
            .field("params", &self.params)
            .finish()
    }
}

impl StarMap {
    /// Default pipeline over an environment: Hipparcos catalog from CDS, DE421 kernel.
    pub fn new(env: StarMapEnv) -> Result<Self, StarMapError> {
        StarMap::builder().env(env).build()
    }

    pub fn builder() -> StarMapBuilder {
        StarMapBuilder::default()
    }

    pub fn env(&self) -> &StarMapEnv {
        &self.env
    }

    pub fn params(&self) -> &ChartParams {
        &self.params
    }

    /// The star catalog, loaded on first access.
    ///
    /// Return
    /// ------
    /// * The shared catalog, or the loader error ([`StarMapError::CatalogUnavailable`]).
    ///   A failure is not cached.
    pub fn catalog(&self) -> Result<&StarCatalog, StarMapError> {
        self.catalog.get_or_try_init(|| {
            let catalog = self.catalog_loader.load_catalog()?;
            info!(stars = catalog.len(), "catalog ready");
            Ok::<_, StarMapError>(catalog)
        })
    }

    /// The ephemeris, opened on first access.
    pub fn ephemeris(&self) -> Result<&dyn EphemerisProvider, StarMapError> {
        let provider = self.ephemeris.get_or_try_init(|| {
            let kernel = self.jpl_source.load(&self.env)?;
            info!(source = %self.jpl_source, "ephemeris ready");
            Ok::<_, StarMapError>(Arc::new(kernel) as Arc<dyn EphemerisProvider>)
        })?;
        Ok(provider.as_ref())
    }

    /// Topocentric frame of `observer` at `instant`.
    pub fn observer_frame(
        &self,
        instant: &Epoch,
        observer: &Observer,
    ) -> Result<ObserverFrame, StarMapError> {
        self.ephemeris()?
            .observer_at(observer, instant, self.env.ut1_provider.as_ref())
    }

    /// Render the sky of `observer` at `instant`.
    ///
    /// Arguments
    /// ---------
    /// * `instant`: the observation instant
    /// * `observer`: the site
    ///
    /// Return
    /// ------
    /// * The chart, or the first error met along the pipeline.
    pub fn try_plot_sky(
        &self,
        instant: &Epoch,
        observer: &Observer,
    ) -> Result<SkyChart, StarMapError> {
        let catalog = self.catalog()?;
        let frame = self.observer_frame(instant, observer)?;

        let directions = apparent_positions(catalog, &frame);
        let points = self.projection.project_all(&directions)?;
        let chart = render(&points, catalog.stars(), &self.params)?;

        debug!(%instant, observer = %observer, %chart, "sky plotted");
        Ok(chart)
    }

    /// Render the sky, turning any failure into a user-facing message.
    ///
    /// Return
    /// ------
    /// * [`ChartOutcome::Rendered`] with the chart, or [`ChartOutcome::Failed`] with
    ///   `"could not render sky chart: <reason>"`. Never panics on pipeline errors.
    pub fn plot_sky(&self, instant: &Epoch, observer: &Observer) -> ChartOutcome {
        let result = self.try_plot_sky(instant, observer);
        if let Err(e) = &result {
            error!(kind = e.kind(), error = %e, "sky chart failed");
        }
        result.into()
    }
}

/// Builder for [`StarMap`].
///
/// Defaults: environment from [`StarMapEnv::new`], Hipparcos catalog from its CDS URL,
/// `naif:DE421` kernel, default [`ChartParams`].
#[derive(Default)]
pub struct StarMapBuilder {
    env: Option<StarMapEnv>,
    catalog_loader: Option<Arc<dyn CatalogLoader>>,
    catalog_source: Option<CatalogSource>,
    jpl_source: Option<EphemFileSource>,
    ephemeris: Option<Arc<dyn EphemerisProvider>>,
    params: Option<ChartParams>,
}

impl StarMapBuilder {
    pub fn env(mut self, env: StarMapEnv) -> Self {
        self.env = Some(env);
        self
    }

    /// Use a custom catalog loader (takes precedence over [`Self::catalog_source`]).
    pub fn catalog_loader(mut self, loader: Arc<dyn CatalogLoader>) -> Self {
        self.catalog_loader = Some(loader);
        self
    }

    /// Use a preloaded catalog.
    pub fn catalog(self, catalog: StarCatalog) -> Self {
        self.catalog_loader(Arc::new(catalog))
    }

    pub fn catalog_source(mut self, source: CatalogSource) -> Self {
        self.catalog_source = Some(source);
        self
    }

    pub fn jpl_source(mut self, source: EphemFileSource) -> Self {
        self.jpl_source = Some(source);
        self
    }

    /// Use an already opened ephemeris instead of loading [`Self::jpl_source`].
    pub fn ephemeris(mut self, provider: Arc<dyn EphemerisProvider>) -> Self {
        self.ephemeris = Some(provider);
        self
    }

    pub fn params(mut self, params: ChartParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Result<StarMap, StarMapError> {
        let env = match self.env {
            Some(env) => env,
            None => StarMapEnv::new()?,
        };

        let catalog_loader = match self.catalog_loader {
            Some(loader) => loader,
            None => Arc::new(HipparcosLoader::new(
                self.catalog_source.unwrap_or_default(),
                env.clone(),
            )),
        };

        let jpl_source = match self.jpl_source {
            Some(source) => source,
            None => EphemFileSource::from_str(DEFAULT_EPHEMERIS)?,
        };

        let ephemeris = match self.ephemeris {
            Some(provider) => OnceCell::with_value(provider),
            None => OnceCell::new(),
        };

        Ok(StarMap {
            env,
            catalog_loader,
            catalog: OnceCell::new(),
            jpl_source,
            ephemeris,
            params: self.params.unwrap_or_default(),
            projection: StereographicProjection::zenith(),
        })
    }
}
