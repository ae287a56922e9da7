/// Runtime settings for launching an app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Selector of the element the app is rendered into.
    pub mount_selector: String,
    /// Maximum level forwarded to the browser console.
    pub log_level: tracing::Level,
    pub log_to_console: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mount_selector: "#app".to_string(),
            log_level: tracing::Level::INFO,
            log_to_console: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mount_selector(mut self, selector: impl Into<String>) -> Self {
        self.mount_selector = selector.into();
        self
    }

    pub fn with_log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.mount_selector, "#app");
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert!(config.log_to_console);
        assert_eq!(Config::new(), config);
    }

    #[rstest]
    fn builder_overrides() {
        let config = Config::new()
            .with_mount_selector("#root")
            .with_log_level(tracing::Level::TRACE)
            .with_log_to_console(false);
        assert_eq!(config.mount_selector, "#root");
        assert_eq!(config.log_level, tracing::Level::TRACE);
        assert!(!config.log_to_console);
    }
}
