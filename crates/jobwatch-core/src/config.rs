//! Configuration management for jobwatch.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Every section falls back to defaults that
//! reproduce the stock LinkedIn guest-search behaviour, so running without a
//! config file is the normal case.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Country, DEFAULT_COUNTRIES};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "JOBWATCH_CONFIG";

/// Main application configuration.
///
/// This is loaded from `~/.config/jobwatch/config.toml` (or platform equivalent),
/// or from the file named by `JOBWATCH_CONFIG`. If no file exists, default
/// values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Country loop and retry settings
    pub scraping: ScrapingConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Output file settings
    pub output: OutputConfig,
    /// Log file and filter settings
    pub logging: LoggingConfig,
    /// Target site URLs and selectors
    pub site: SiteConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides, then validate it.
    ///
    /// `JOBWATCH_CONFIG` selects an explicit config file; see
    /// [`AppConfig::apply_env_overrides`] for the individual overrides.
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from(Path::new(&path))?,
            Err(_) => Self::load()?,
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Supports the following variables:
    /// - `JOBWATCH_HEADLESS`: browser headless mode (true/false)
    /// - `JOBWATCH_OUTPUT`: path of the jobs JSON file
    /// - `JOBWATCH_LOG_FILE`: path of the log file
    /// - `JOBWATCH_COUNTRIES`: comma-separated country list
    /// - `JOBWATCH_MAX_RETRIES`: attempts per country
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("JOBWATCH_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("JOBWATCH_OUTPUT") {
            tracing::debug!("Override output.jobs_file from env: {}", val);
            self.output.jobs_file = PathBuf::from(val);
        }

        if let Some(val) = lookup("JOBWATCH_LOG_FILE") {
            tracing::debug!("Override logging.log_file from env: {}", val);
            self.logging.log_file = PathBuf::from(val);
        }

        if let Some(val) = lookup("JOBWATCH_COUNTRIES") {
            let countries: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            if !countries.is_empty() {
                tracing::debug!("Override scraping.countries from env: {} countries", countries.len());
                self.scraping.countries = countries;
            }
        }

        if let Some(val) = lookup("JOBWATCH_MAX_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.scraping.max_retries = retries;
                tracing::debug!("Override scraping.max_retries from env: {}", retries);
            }
        }
    }

    /// Check values that would make the scrape loop meaningless.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scraping.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.max_retries".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.scraping.max_jobs_per_country == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.max_jobs_per_country".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        self.scraping.countries()?;

        if !self.site.search_url_template.contains("{country}") {
            return Err(ConfigError::InvalidValue {
                field: "site.search_url_template".to_string(),
                reason: "must contain the {country} placeholder".to_string(),
            });
        }

        self.site.selectors.validate()
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/jobwatch/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "jobwatch", "jobwatch").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Country loop and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Countries searched in order, then repeated
    pub countries: Vec<String>,
    /// Attempts per country before it is skipped
    pub max_retries: u32,
    /// Pause after each country in seconds
    pub country_delay_secs: u64,
    /// Job links taken from each search page
    pub max_jobs_per_country: usize,
    /// Whether to try the "past 24 hours" filter first
    pub apply_recent_filter: bool,
    /// Passes over the country list before exiting (unset = forever)
    pub max_cycles: Option<u32>,
}

impl ScrapingConfig {
    /// Validated country list.
    pub fn countries(&self) -> ConfigResult<Vec<Country>> {
        if self.countries.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scraping.countries".to_string(),
                reason: "at least one country is required".to_string(),
            });
        }

        self.countries
            .iter()
            .map(|name| {
                Country::new(name.as_str()).map_err(|e| ConfigError::InvalidValue {
                    field: "scraping.countries".to_string(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Pause after each country.
    #[must_use]
    pub fn country_delay(&self) -> Duration {
        Duration::from_secs(self.country_delay_secs)
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(ToString::to_string).collect(),
            max_retries: 3,
            country_delay_secs: 10,
            max_jobs_per_country: 10,
            apply_recent_filter: true,
            max_cycles: None,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Pass `--no-sandbox` to Chromium (needed in most containers)
    pub no_sandbox: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Page load timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Wait for the job title on a detail page, in seconds
    pub detail_ready_timeout_secs: u64,
    /// Wait for each individual detail field, in seconds
    pub field_timeout_secs: u64,
    /// Wait for the filter option to appear, in seconds
    pub filter_timeout_secs: u64,
    /// User agent sent by every session
    pub user_agent: String,
    /// Pick a random desktop user agent per session instead
    pub randomize_user_agent: bool,
    /// Chrome/Chromium binary (autodetected when unset)
    pub chrome_executable: Option<PathBuf>,
    /// Profile directory, cleared before each country (temporary when unset)
    pub profile_dir: Option<PathBuf>,
}

impl BrowserConfig {
    /// Page load timeout.
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Detail page readiness timeout.
    #[must_use]
    pub fn detail_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_ready_timeout_secs)
    }

    /// Per-field selector timeout.
    #[must_use]
    pub fn field_timeout(&self) -> Duration {
        Duration::from_secs(self.field_timeout_secs)
    }

    /// Filter option selector timeout.
    #[must_use]
    pub fn filter_timeout(&self) -> Duration {
        Duration::from_secs(self.filter_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 60,
            detail_ready_timeout_secs: 15,
            field_timeout_secs: 6,
            filter_timeout_secs: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36".to_string(),
            randomize_user_agent: false,
            chrome_executable: None,
            profile_dir: None,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON array of scraped job records
    pub jobs_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jobs_file: PathBuf::from("linkedin_detailed_jobs.json"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only log file mirrored from the console
    pub log_file: PathBuf,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("linkedin.log"),
            filter: "info,jobwatch=debug".to_string(),
        }
    }
}

/// Target site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Search page URL with a `{country}` placeholder
    pub search_url_template: String,
    /// Canonical origin job links are rewritten to
    pub base_url: String,
    /// Host suffix identifying the site in scraped links
    pub host: String,
    /// CSS selectors for the search and detail pages
    pub selectors: SiteSelectors,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            search_url_template: "https://www.linkedin.com/jobs/search/?location={country}"
                .to_string(),
            base_url: "https://www.linkedin.com".to_string(),
            host: "linkedin.com".to_string(),
            selectors: SiteSelectors::default(),
        }
    }
}

/// CSS selectors for the search results and job detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// "Sign in to view more jobs" modal close button
    pub modal_dismiss: String,
    /// Button opening the date filter
    pub filter_button: String,
    /// "Past 24 hours" option
    pub past_24_hours: String,
    /// Filter submit button
    pub filter_submit: String,
    /// Anchor of each job card
    pub job_card_link: String,
    /// Title inside the job card anchor
    pub job_card_title: String,
    /// Detail page title
    pub title: String,
    /// Detail page title on the older layout
    pub title_fallback: String,
    /// Company name
    pub company: String,
    /// Company flavor row
    pub company_description: String,
    /// Location bullet
    pub location: String,
    /// Description body
    pub job_description: String,
    /// Relative posting time
    pub posted_time: String,
    /// Items of the job criteria list
    pub criteria_item: String,
    /// Label inside a criteria item
    pub criteria_subheader: String,
    /// Value inside a criteria item
    pub criteria_text: String,
}

impl SiteSelectors {
    /// Reject empty selectors.
    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("modal_dismiss", &self.modal_dismiss),
            ("filter_button", &self.filter_button),
            ("past_24_hours", &self.past_24_hours),
            ("filter_submit", &self.filter_submit),
            ("job_card_link", &self.job_card_link),
            ("job_card_title", &self.job_card_title),
            ("title", &self.title),
            ("title_fallback", &self.title_fallback),
            ("company", &self.company),
            ("company_description", &self.company_description),
            ("location", &self.location),
            ("job_description", &self.job_description),
            ("posted_time", &self.posted_time),
            ("criteria_item", &self.criteria_item),
            ("criteria_subheader", &self.criteria_subheader),
            ("criteria_text", &self.criteria_text),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("site.selectors.{name}"),
                    reason: "selector cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Either of the title selectors, used to detect a loaded detail page.
    #[must_use]
    pub fn any_title(&self) -> String {
        format!("{}, {}", self.title, self.title_fallback)
    }
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            modal_dismiss: "button.modal__dismiss".to_string(),
            filter_button: "button.filter-button".to_string(),
            past_24_hours: r#"label[for="f_TPR-3"]"#.to_string(),
            filter_submit: "button.filter__submit-button".to_string(),
            job_card_link: ".base-card__full-link".to_string(),
            job_card_title: ".sr-only".to_string(),
            title: ".top-card-layout__title".to_string(),
            title_fallback: ".topcard__title".to_string(),
            company: ".topcard__org-name-link".to_string(),
            company_description: ".topcard__flavor-row".to_string(),
            location: ".topcard__flavor--bullet".to_string(),
            job_description: ".show-more-less-html__markup".to_string(),
            posted_time: ".posted-time-ago__text".to_string(),
            criteria_item: ".description__job-criteria-list li".to_string(),
            criteria_subheader: ".description__job-criteria-subheader".to_string(),
            criteria_text: ".description__job-criteria-text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scraping.max_retries, 3);
        assert_eq!(config.scraping.country_delay_secs, 10);
        assert_eq!(config.scraping.max_jobs_per_country, 10);
        assert_eq!(config.scraping.countries.len(), DEFAULT_COUNTRIES.len());
        assert!(config.scraping.max_cycles.is_none());
        assert!(config.browser.headless);
        assert_eq!(config.browser.navigation_timeout(), Duration::from_secs(60));
        assert_eq!(
            config.output.jobs_file,
            PathBuf::from("linkedin_detailed_jobs.json")
        );
        assert_eq!(config.logging.log_file, PathBuf::from("linkedin.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scraping]"));
        assert!(toml_str.contains("[browser]"));
        assert!(toml_str.contains("[site.selectors]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.site.selectors.past_24_hours, r#"label[for="f_TPR-3"]"#);
        assert_eq!(parsed.scraping.countries, config.scraping.countries);
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.scraping.countries = vec!["Norway".to_string(), "Iceland".to_string()];
        config.browser.headless = false;

        config.save_to(&config_path).expect("save config");
        let loaded = AppConfig::load_from(&config_path).expect("load config");

        assert_eq!(loaded.scraping.countries, vec!["Norway", "Iceland"]);
        assert!(!loaded.browser.headless);
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let err = AppConfig::load_from(&tmp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("JOBWATCH_HEADLESS", "false"),
            ("JOBWATCH_OUTPUT", "/tmp/jobs.json"),
            ("JOBWATCH_COUNTRIES", "Norway, Iceland,,"),
            ("JOBWATCH_MAX_RETRIES", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(ToString::to_string));

        assert!(!config.browser.headless);
        assert_eq!(config.output.jobs_file, PathBuf::from("/tmp/jobs.json"));
        assert_eq!(config.scraping.countries, vec!["Norway", "Iceland"]);
        assert_eq!(config.scraping.max_retries, 5);
        assert_eq!(config.logging.log_file, PathBuf::from("linkedin.log"));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "JOBWATCH_HEADLESS" => Some("sometimes".to_string()),
            "JOBWATCH_MAX_RETRIES" => Some("many".to_string()),
            _ => None,
        });

        assert!(config.browser.headless);
        assert_eq!(config.scraping.max_retries, 3);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[scraping]
countries = ["Norway"]
max_cycles = 1

[site.selectors]
company = ".company"
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scraping.countries, vec!["Norway"]);
        assert_eq!(config.scraping.max_cycles, Some(1));
        assert_eq!(config.site.selectors.company, ".company");
        // These should be defaults
        assert_eq!(config.scraping.max_retries, 3);
        assert_eq!(config.site.selectors.title, ".top-card-layout__title");
        assert!(config.browser.headless);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.scraping.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scraping.countries.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scraping.countries = vec!["Norway".to_string(), "  ".to_string()];
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.site.search_url_template = "https://www.linkedin.com/jobs/search/".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.site.selectors.company = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.selectors.company"));
    }

    #[test]
    fn test_any_title_selector() {
        let selectors = SiteSelectors::default();
        assert_eq!(
            selectors.any_title(),
            ".top-card-layout__title, .topcard__title"
        );
    }
}
