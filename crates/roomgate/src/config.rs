//! Launcher configuration.

use std::path::PathBuf;

use roomgate_dispatch::{
    DEFAULT_MODULE_ASSET, DEFAULT_RENDER_TARGET, DispatchError, FsAssetSource,
    ProcessHost, RenderTarget,
};

/// Lobby HTTP endpoint.
pub const HTTP_SERVER_ENV: &str = "ROOMGATE_HTTP_SERVER";
/// Engine WebSocket endpoint.
pub const WS_SERVER_ENV: &str = "ROOMGATE_WS_SERVER";
/// Directory holding the engine module asset.
pub const ASSET_ROOT_ENV: &str = "ROOMGATE_ASSET_ROOT";
/// Engine executable for native hand-off.
pub const ENGINE_ENV: &str = "ROOMGATE_ENGINE";

/// Default lobby HTTP endpoint.
pub const DEFAULT_HTTP_SERVER: &str = "http://localhost:8080";
/// Default engine WebSocket endpoint.
pub const DEFAULT_WS_SERVER: &str = "ws://localhost:8080";

/// Where the launcher finds its services and its engine.
///
/// The endpoints stay raw strings: they are connection fields like any
/// other and only become URLs once the validator accepts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Lobby HTTP endpoint.
    pub http_server: String,
    /// Engine WebSocket endpoint.
    pub ws_server: String,
    /// Directory the module asset is read from.
    pub asset_root: PathBuf,
    /// File name of the module asset.
    pub module_asset: String,
    /// Engine executable; `None` means the current executable.
    pub engine_program: Option<PathBuf>,
    /// Mount point for the in-process engine.
    pub render_target: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            http_server: DEFAULT_HTTP_SERVER.to_string(),
            ws_server: DEFAULT_WS_SERVER.to_string(),
            asset_root: PathBuf::from("."),
            module_asset: DEFAULT_MODULE_ASSET.to_string(),
            engine_program: None,
            render_target: DEFAULT_RENDER_TARGET.to_string(),
        }
    }
}

impl LauncherConfig {
    /// Defaults overridden by any `ROOMGATE_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// variable name. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            http_server: get(HTTP_SERVER_ENV).unwrap_or(defaults.http_server),
            ws_server: get(WS_SERVER_ENV).unwrap_or(defaults.ws_server),
            asset_root: get(ASSET_ROOT_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_root),
            module_asset: defaults.module_asset,
            engine_program: get(ENGINE_ENV).map(PathBuf::from),
            render_target: defaults.render_target,
        }
    }

    /// Sets the lobby HTTP endpoint.
    pub fn with_http_server(mut self, server: impl Into<String>) -> Self {
        self.http_server = server.into();
        self
    }

    /// Sets the engine WebSocket endpoint.
    pub fn with_ws_server(mut self, server: impl Into<String>) -> Self {
        self.ws_server = server.into();
        self
    }

    /// Sets the engine executable.
    pub fn with_engine_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.engine_program = Some(program.into());
        self
    }

    /// Sets the render target selector.
    pub fn with_render_target(mut self, target: impl Into<String>) -> Self {
        self.render_target = target.into();
        self
    }

    /// The module asset reader.
    pub fn asset_source(&self) -> FsAssetSource {
        FsAssetSource::new(&self.asset_root, &self.module_asset)
    }

    /// The native host process runner.
    ///
    /// # Errors
    /// Fails only when no program is configured and the current
    /// executable's path can't be determined.
    pub fn process_host(&self) -> Result<ProcessHost, DispatchError> {
        match &self.engine_program {
            Some(program) => Ok(ProcessHost::new(program)),
            None => ProcessHost::current_exe(),
        }
    }

    /// The render target.
    pub fn target(&self) -> RenderTarget {
        RenderTarget::new(&self.render_target)
    }
}
