use std::sync::Arc;
use std::time::Duration;

use rand::Rng as _;
use url::Url;

use crate::acquire::fetch::ImageFetcher;
use crate::acquire::{BackgroundSource, ImageOrigin};
use crate::assets::decode::decode_image;
use crate::config::{MAX_FETCH_TIMEOUT_SECS, PipelineConfig};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::scope::ResourceScope;

/// Suffix of materialized background files.
pub const IMAGE_SUFFIX: &str = ".jpg";

/// One fallible way of obtaining a background for a prompt.
pub trait BackgroundStrategy: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Try to produce a background. Temp files go into `scope`.
    fn attempt(&self, prompt: &str, scope: &mut ResourceScope) -> ReelResult<BackgroundSource>;
}

/// Remote endpoint shapes understood by [`RemoteImageStrategy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageEndpoint {
    /// `<base>/<prompt>?width=W&height=H&nologo=true&seed=S&model=M`
    Generator {
        /// Base URL; the prompt is appended as one path segment.
        base: String,
        /// Model identifier.
        model: String,
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Inclusive upper bound of the random seed.
        max_seed: u32,
    },
    /// `<base>/<prompt without whitespace>/W/H`
    Stock {
        /// Base URL.
        base: String,
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl ImageEndpoint {
    /// Strategy origin recorded on success.
    pub fn origin(&self) -> ImageOrigin {
        match self {
            Self::Generator { .. } => ImageOrigin::Generator,
            Self::Stock { .. } => ImageOrigin::Stock,
        }
    }

    /// Request URL for `prompt`. `seed` is ignored by the stock endpoint.
    pub fn url_for(&self, prompt: &str, seed: u32) -> ReelResult<Url> {
        match self {
            Self::Generator {
                base,
                model,
                width,
                height,
                ..
            } => {
                let mut url = parse_base(base)?;
                push_segments(&mut url, &[prompt])?;
                url.query_pairs_mut()
                    .append_pair("width", &width.to_string())
                    .append_pair("height", &height.to_string())
                    .append_pair("nologo", "true")
                    .append_pair("seed", &seed.to_string())
                    .append_pair("model", model);
                Ok(url)
            }
            Self::Stock {
                base,
                width,
                height,
            } => {
                let mut url = parse_base(base)?;
                let key = sanitize_stock_key(prompt);
                push_segments(&mut url, &[&key, &width.to_string(), &height.to_string()])?;
                Ok(url)
            }
        }
    }

    fn pick_seed(&self) -> u32 {
        match self {
            Self::Generator { max_seed, .. } => rand::thread_rng().gen_range(0..=*max_seed),
            Self::Stock { .. } => 0,
        }
    }
}

/// Stock endpoint key: the prompt with all whitespace removed.
pub fn sanitize_stock_key(prompt: &str) -> String {
    prompt.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Request timeout for `secs`, clamped to `(0, MAX_FETCH_TIMEOUT_SECS]`.
pub(crate) fn fetch_timeout(secs: f64) -> Duration {
    let secs = if secs.is_nan() { 0.0 } else { secs.min(MAX_FETCH_TIMEOUT_SECS) };
    Duration::try_from_secs_f64(secs)
        .unwrap_or_default()
        .max(Duration::from_millis(1))
}

fn parse_base(base: &str) -> ReelResult<Url> {
    Url::parse(base).map_err(|e| ReelError::validation(format!("invalid endpoint '{base}': {e}")))
}

fn push_segments(url: &mut Url, segments: &[&str]) -> ReelResult<()> {
    let shown = url.to_string();
    let mut path = url
        .path_segments_mut()
        .map_err(|()| ReelError::validation(format!("endpoint '{shown}' cannot take a path")))?;
    path.pop_if_empty();
    for seg in segments {
        path.push(seg);
    }
    Ok(())
}

/// Fetch an image from an [`ImageEndpoint`] with a bounded wait.
///
/// A body that does not decode as an image counts as a failure.
pub struct RemoteImageStrategy {
    endpoint: ImageEndpoint,
    timeout: Duration,
    fetcher: Arc<dyn ImageFetcher>,
}

impl RemoteImageStrategy {
    /// Build a strategy for `endpoint`.
    pub fn new(endpoint: ImageEndpoint, timeout: Duration, fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self {
            endpoint,
            timeout,
            fetcher,
        }
    }
}

impl BackgroundStrategy for RemoteImageStrategy {
    fn name(&self) -> &str {
        match self.endpoint.origin() {
            ImageOrigin::Generator => "generator",
            ImageOrigin::Stock => "stock",
        }
    }

    fn attempt(&self, prompt: &str, scope: &mut ResourceScope) -> ReelResult<BackgroundSource> {
        let url = self.endpoint.url_for(prompt, self.endpoint.pick_seed())?;
        tracing::debug!(strategy = self.name(), %url, timeout_secs = self.timeout.as_secs_f64(), "fetching background");

        let bytes = self.fetcher.fetch(&url, self.timeout)?;
        decode_image(&bytes).map_err(|e| {
            ReelError::acquisition(format!("{url} did not return a decodable image: {e}"))
        })?;

        let local_path = scope.materialize(&bytes, IMAGE_SUFFIX)?;
        Ok(BackgroundSource::GeneratedImage {
            local_path,
            origin: self.endpoint.origin(),
        })
    }
}

/// Ordered background strategies with an infallible solid-colour terminal.
pub struct BackgroundChain {
    strategies: Vec<Box<dyn BackgroundStrategy>>,
    terminal: Rgb8,
}

impl BackgroundChain {
    /// Empty chain that always yields `terminal`.
    pub fn new(terminal: Rgb8) -> Self {
        Self {
            strategies: Vec::new(),
            terminal,
        }
    }

    /// Append a strategy tried after all previously pushed ones.
    pub fn with_strategy(mut self, strategy: impl BackgroundStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Generator, then stock photo, then the configured fill.
    pub fn from_config(cfg: &PipelineConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let acq = &cfg.acquisition;
        let generator = ImageEndpoint::Generator {
            base: acq.generator_url.clone(),
            model: acq.generator_model.clone(),
            width: cfg.canvas.width,
            height: cfg.canvas.height,
            max_seed: acq.max_seed,
        };
        let stock = ImageEndpoint::Stock {
            base: acq.stock_url.clone(),
            width: cfg.canvas.width,
            height: cfg.canvas.height,
        };
        Self::new(acq.fallback_rgb)
            .with_strategy(RemoteImageStrategy::new(
                generator,
                fetch_timeout(acq.generator_timeout_secs),
                Arc::clone(&fetcher),
            ))
            .with_strategy(RemoteImageStrategy::new(
                stock,
                fetch_timeout(acq.stock_timeout_secs),
                fetcher,
            ))
    }

    /// Strategy names in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run strategies in order; the first success wins. Never fails.
    #[tracing::instrument(skip(self, scope))]
    pub fn acquire_background(&self, prompt: &str, scope: &mut ResourceScope) -> BackgroundSource {
        for strategy in &self.strategies {
            match strategy.attempt(prompt, scope) {
                Ok(source) => {
                    tracing::info!(strategy = strategy.name(), "background acquired");
                    return source;
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "background strategy failed");
                }
            }
        }
        tracing::info!(rgb = ?self.terminal, "using solid colour background");
        BackgroundSource::SolidColor { rgb: self.terminal }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/acquire/chain.rs"]
mod tests;
