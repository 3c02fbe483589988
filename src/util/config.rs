#![allow(clippy::module_name_repetitions)]

use std::{env, net::IpAddr, path::Path, time::Duration as StdDuration};

use {
    cookie::{Cookie, SameSite},
    derivative::Derivative,
    figment::{
        providers::{Env, Format, Serialized, Toml},
        Figment,
    },
    serde::{Deserialize, Serialize},
    strum::{Display, EnumString, VariantNames},
    time::Duration,
};

use crate::Error;

pub const ENV_PREFIX: &str = "SESSION_GATE_";

#[derive(
    Default,
    Display,
    EnumString,
    VariantNames,
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
pub enum Verbosity {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Default, Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggerConfig {
    pub verbosity: Verbosity,
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct Website {
    #[derivative(Default(value = "IpAddr::from([127, 0, 0, 1])"))]
    pub bind_address: IpAddr,
    #[derivative(Default(value = "8080"))]
    pub bind_port: u16,
}

#[derive(
    Default,
    Display,
    EnumString,
    VariantNames,
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
pub enum SameSiteConfig {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSiteConfig> for SameSite {
    fn from(policy: SameSiteConfig) -> Self {
        match policy {
            SameSiteConfig::Strict => Self::Strict,
            SameSiteConfig::Lax => Self::Lax,
            SameSiteConfig::None => Self::None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct SessionConfig {
    #[derivative(Default(value = "\"session_id\".into()"))]
    pub cookie_name: String,
    pub same_site_policy: SameSiteConfig,
    pub secure: bool,
    /// Lifetime given to sessions created through the builder's `MemoryStore`.
    #[derivative(Default(value = "86_400"))]
    pub ttl_secs: i64,
    /// Upper bound on any single session store call made while serving a request.
    #[derivative(Default(value = "2_000"))]
    pub store_timeout_ms: u64,
    /// Period of the expired-session reaper. Zero disables it.
    #[derivative(Default(value = "60"))]
    pub reap_interval_secs: u64,
}

impl SessionConfig {
    pub const fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_secs)
    }

    pub const fn store_timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.store_timeout_ms)
    }

    pub const fn reap_interval(&self) -> Option<StdDuration> {
        if self.reap_interval_secs == 0 {
            None
        } else {
            Some(StdDuration::from_secs(self.reap_interval_secs))
        }
    }

    /// A removal cookie that makes the browser drop the session cookie.
    /// `SameSite=None` always carries `Secure`.
    pub fn expired_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), ""))
            .path("/")
            .http_only(true)
            .same_site(self.same_site_policy.into())
            .secure(self.secure || self.same_site_policy == SameSiteConfig::None)
            .removal()
            .build()
    }
}

/// What the gate answers to a request without a live session.
#[derive(
    Default,
    Display,
    EnumString,
    VariantNames,
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Challenge {
    #[default]
    Unauthorized,
    RedirectToLogin,
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct Routes {
    #[derivative(Default(value = "\"/\".into()"))]
    pub root: String,
    #[derivative(Default(value = "\"hello\".into()"))]
    pub greeting: String,
    #[derivative(Default(value = "\"logout\".into()"))]
    pub logout: String,
    #[derivative(Default(value = "\"logout/success\".into()"))]
    pub logout_success: String,
    #[derivative(Default(value = "\"login\".into()"))]
    pub login: String,
}

impl Routes {
    /// Returns a new `Routes` struct with the `root` path prepended to all paths.
    pub fn with_root(&self) -> Self {
        let normalized_base = normalize_slash(&self.root);
        Self {
            root: normalized_base.clone(),
            greeting: join_paths(&normalized_base, &self.greeting),
            logout: join_paths(&normalized_base, &self.logout),
            logout_success: join_paths(&normalized_base, &self.logout_success),
            login: join_paths(&normalized_base, &self.login),
        }
    }
}

fn normalize_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

fn join_paths(base: &str, path: &str) -> String {
    let trimmed_base = base.trim_end_matches('/');
    let trimmed_path = path.trim_start_matches('/');
    format!("{trimmed_base}/{trimmed_path}")
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    #[derivative(Default(value = "\"dev\".into()"))]
    pub run_mode: String,
    pub logger: LoggerConfig,
    pub website: Website,
    pub session: SessionConfig,
    pub routes: Routes,
    pub challenge: Challenge,
}

impl Config {
    /// Loads `default.toml`, `local.toml` and `<RUN_MODE>.toml` from `config_dir`,
    /// in that order, then applies `SESSION_GATE_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be parsed or a value has the wrong type.
    pub fn load(config_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "dev".to_string());
        Self::figment(config_dir.as_ref(), &run_mode)
            .extract()
            .map_err(Error::from)
    }

    pub fn figment(config_dir: &Path, run_mode: &str) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_dir.join("default.toml")))
            .merge(Toml::file(config_dir.join("local.toml")))
            .merge(Toml::file(config_dir.join(format!("{run_mode}.toml"))))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
