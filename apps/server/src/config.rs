// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use roomscan_processing::SessionConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Directory for cache storage.
    pub cache_dir: String,
    /// Maximum frame upload size in MB.
    pub max_frame_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
    /// Period between incremental passes of a live scan.
    pub tick_interval_ms: u64,
    /// Upper bound on points per incremental pass.
    pub max_tick_points: usize,
    /// Maximum number of sessions kept in memory.
    pub max_sessions: usize,
    /// Seconds without client activity before a live session is aborted.
    pub session_idle_timeout_secs: u64,
    /// Render backend endpoint. Rendering is disabled when unset.
    pub render_service_url: Option<String>,
    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
}

/// `LOG_FORMAT` values selecting JSON output
fn is_json_format(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("json")
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 8080),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or_else(|_| {
                // Docker images ship /app/cache; local runs use ./.cache
                if std::path::Path::new("/.dockerenv").exists() {
                    "/app/cache".into()
                } else {
                    std::env::current_dir()
                        .ok()
                        .and_then(|dir| dir.join(".cache").to_str().map(|s| s.to_string()))
                        .unwrap_or_else(|| "./.cache".into())
                }
            }),
            max_frame_size_mb: env_or("MAX_FRAME_SIZE_MB", 16),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 60),
            worker_threads: env_or("WORKER_THREADS", num_cpus::get()),
            tick_interval_ms: env_or("TICK_INTERVAL_MS", 500),
            max_tick_points: env_or("MAX_TICK_POINTS", 1000),
            max_sessions: env_or("MAX_SESSIONS", 32),
            session_idle_timeout_secs: env_or("SESSION_IDLE_TIMEOUT_SECS", 300),
            render_service_url: std::env::var("RENDER_SERVICE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| is_json_format(&v))
                .unwrap_or(false),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| {
                    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173".into()
                })
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Session defaults derived from the server settings.
    pub fn session_defaults(&self) -> SessionConfig {
        SessionConfig {
            tick_interval_ms: self.tick_interval_ms,
            max_tick_points: self.max_tick_points,
            ..SessionConfig::default()
        }
    }

    pub fn session_idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
