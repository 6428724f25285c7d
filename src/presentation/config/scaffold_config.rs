use std::time::Duration;

/// Scaffold mode swaps the transcription backend for the mock engine.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub mock_response_delay_ms: u64,
}

impl ScaffoldConfig {
    /// Reads `SCAFFOLD_MODE` and `MOCK_RESPONSE_DELAY` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("SCAFFOLD_MODE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);
        let mock_response_delay_ms = lookup("MOCK_RESPONSE_DELAY")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        Self {
            enabled,
            mock_response_delay_ms,
        }
    }

    pub fn mock_response_delay(&self) -> Duration {
        Duration::from_millis(self.mock_response_delay_ms)
    }
}
