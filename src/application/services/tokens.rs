//! Design token service
//!
//! Loads token bundles from `<tokens_dir>/<category>.json` and renders the
//! CSS custom property and Tailwind exports.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::tokens::{
    build_css_variables, build_tailwind_extend, render_tailwind_module, TokenSources,
};
use crate::domain::{DomainError, TokenBundle};
use crate::infrastructure::traits::FileSystem;

pub const CSS_EXPORT_FILE: &str = "design-tokens.css";
pub const TAILWIND_EXPORT_FILE: &str = "tailwind.tokens.cjs";

/// Rendered export files.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenExports {
    pub css: String,
    pub tailwind: String,
}

/// Service for reading and exporting design tokens.
pub struct TokenService {
    fs: Arc<dyn FileSystem>,
    tokens_dir: PathBuf,
    prefix: String,
    cache: Mutex<HashMap<String, Arc<TokenBundle>>>,
}

impl TokenService {
    pub fn new(fs: Arc<dyn FileSystem>, tokens_dir: PathBuf, prefix: String) -> Self {
        Self {
            fs,
            tokens_dir,
            prefix,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn tokens_dir(&self) -> &Path {
        &self.tokens_dir
    }

    /// Categories available under the tokens directory, sorted.
    pub fn available_categories(&self) -> ApplicationResult<Vec<String>> {
        if !self.fs.is_dir(&self.tokens_dir) {
            return Ok(Vec::new());
        }
        let files = self
            .fs
            .list_files(&self.tokens_dir, "json")
            .with_path_context("list token bundles", &self.tokens_dir)?;
        Ok(files
            .iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect())
    }

    /// Load a bundle, served from cache after the first read.
    #[instrument(level = "debug", skip(self))]
    pub fn load_bundle(&self, category: &str) -> ApplicationResult<Arc<TokenBundle>> {
        if let Some(bundle) = self.lock_cache()?.get(category) {
            return Ok(bundle.clone());
        }

        let path = self.tokens_dir.join(format!("{}.json", category));
        if !self.fs.exists(&path) {
            return Err(DomainError::TokenBundleNotFound {
                category: category.to_string(),
                path,
            }
            .into());
        }
        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read token bundle", &path)?;
        let raw: Value =
            serde_json::from_str(&content).with_path_context("parse token bundle", &path)?;
        let bundle = Arc::new(TokenBundle::from_value(category, raw)?);
        debug!("loaded token bundle {} ({} keys)", category, bundle.payload.len());

        self.lock_cache()?
            .insert(category.to_string(), bundle.clone());
        Ok(bundle)
    }

    /// Single token by dotted path.
    pub fn get_token(&self, category: &str, path: &str) -> ApplicationResult<Value> {
        let bundle = self.load_bundle(category)?;
        Ok(bundle.get(path)?.clone())
    }

    /// Render both exports from the `colors`, `typography` and `components` bundles.
    #[instrument(level = "debug", skip(self))]
    pub fn render_exports(&self) -> ApplicationResult<TokenExports> {
        let colors = self.load_raw("colors")?;
        let typography = self.load_raw("typography")?;
        let components = self.load_raw("components")?;
        let sources = TokenSources {
            colors: &colors,
            typography: &typography,
            components: &components,
        };

        Ok(TokenExports {
            css: build_css_variables(sources, &self.prefix),
            tailwind: render_tailwind_module(&build_tailwind_extend(sources, &self.prefix)),
        })
    }

    /// Write both exports into `dist_dir`, returning the written paths.
    #[instrument(level = "debug", skip(self))]
    pub fn write_exports(&self, dist_dir: &Path) -> ApplicationResult<Vec<PathBuf>> {
        let exports = self.render_exports()?;
        let targets = [
            (dist_dir.join(CSS_EXPORT_FILE), exports.css),
            (dist_dir.join(TAILWIND_EXPORT_FILE), exports.tailwind),
        ];

        let mut written = Vec::new();
        for (path, content) in targets {
            self.fs
                .ensure_parent(&path)
                .with_path_context("create export directory", &path)?;
            self.fs
                .write(&path, &content)
                .with_path_context("write token export", &path)?;
            info!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Bundle payload as a JSON object, as consumed by the export builders.
    fn load_raw(&self, category: &str) -> ApplicationResult<Value> {
        let bundle = self.load_bundle(category)?;
        Ok(Value::Object(bundle.payload.clone()))
    }

    fn lock_cache(
        &self,
    ) -> ApplicationResult<std::sync::MutexGuard<'_, HashMap<String, Arc<TokenBundle>>>> {
        self.cache.lock().map_err(|_| ApplicationError::Config {
            message: "token cache poisoned".into(),
        })
    }
}
