//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Headless client configuration.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Names the log directory of this run; a timestamp when unset.
    pub session_id: Option<String>,
    /// Party roster (RON). Falls back to the bundled sample party.
    pub party: Option<PathBuf>,
    /// Enemy roster (RON). Falls back to the bundled raiders.
    pub enemies: Option<PathBuf>,
    /// Combat tuning (TOML). Defaults apply when unset.
    pub combat_config: Option<PathBuf>,
    pub seed: Option<u64>,
    /// Pause between an accepted action and its outcome.
    pub settle_delay: Duration,
    /// Print the final report as JSON instead of the battle log.
    pub json: bool,
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WASTELAND_SESSION_ID` - Log session name
    /// - `WASTELAND_PARTY` - Path to the party roster
    /// - `WASTELAND_ENEMIES` - Path to the enemy roster
    /// - `WASTELAND_COMBAT_CONFIG` - Path to combat.toml
    /// - `WASTELAND_SEED` - Battle seed (default: random)
    /// - `WASTELAND_SETTLE_MS` - Settle delay in milliseconds (default: 0)
    /// - `WASTELAND_JSON` - `true` to print the report as JSON
    pub fn from_env() -> Self {
        Self {
            session_id: env::var("WASTELAND_SESSION_ID").ok(),
            party: env::var_os("WASTELAND_PARTY").map(PathBuf::from),
            enemies: env::var_os("WASTELAND_ENEMIES").map(PathBuf::from),
            combat_config: env::var_os("WASTELAND_COMBAT_CONFIG").map(PathBuf::from),
            seed: read_env("WASTELAND_SEED"),
            settle_delay: Duration::from_millis(read_env("WASTELAND_SETTLE_MS").unwrap_or(0)),
            json: read_env("WASTELAND_JSON").unwrap_or(false),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
