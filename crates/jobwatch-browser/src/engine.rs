use crate::actions::{extract_domain, BrowserActions, BrowserLauncher};
use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Interval between element lookups while waiting for a selector
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Options applied to every launched Chromium session
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub no_sandbox: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Fixed user agent; a random desktop agent is picked per session when unset
    pub user_agent: Option<String>,
    /// Timeout for individual CDP requests
    pub request_timeout: Duration,
    pub chrome_executable: Option<PathBuf>,
    pub profile_dir: Option<PathBuf>,
}

impl LaunchOptions {
    /// Fingerprint for the next session
    pub fn fingerprint(&self) -> FingerprintConfig {
        match &self.user_agent {
            Some(agent) => {
                FingerprintConfig::fixed(agent.clone(), self.window_width, self.window_height)
            }
            None => FingerprintConfig::randomized(),
        }
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: None,
            request_timeout: Duration::from_secs(60),
            chrome_executable: None,
            profile_dir: None,
        }
    }
}

/// Profile directory for one session.
///
/// A configured directory is used as is. Otherwise each session gets its own
/// temporary directory, removed when the session ends, so concurrent
/// sessions never share Chromium's profile lock.
fn session_profile(configured: Option<&Path>) -> Result<(PathBuf, Option<TempDir>)> {
    match configured {
        Some(dir) => Ok((dir.to_path_buf(), None)),
        None => {
            let temp = tempfile::Builder::new()
                .prefix("jobwatch-profile-")
                .tempdir()?;
            Ok((temp.path().to_path_buf(), Some(temp)))
        }
    }
}

struct Session {
    browser: Browser,
    // Removed on drop, after the browser has exited
    _profile: Option<TempDir>,
}

/// One Chromium process with a single page
pub struct BrowserEngine {
    session: Mutex<Option<Session>>,
    page: Page,
    handler: JoinHandle<()>,
    fingerprint: FingerprintConfig,
}

impl BrowserEngine {
    /// Launch a browser with default options
    pub async fn new() -> Result<Self> {
        Self::launch(&LaunchOptions::default()).await
    }

    /// Launch a browser with the given options and open a blank page
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let fingerprint = options.fingerprint();

        let mut builder = BrowserConfig::builder()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .request_timeout(options.request_timeout)
            .arg(format!("--user-agent={}", fingerprint.user_agent));
        if options.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &options.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        let (profile_dir, profile) = session_profile(options.profile_dir.as_deref())?;
        builder = builder.user_data_dir(&profile_dir);
        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Drive the CDP connection until the browser goes away
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!(error = %e, "browser handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(BrowserError::ChromiumError(e.to_string()));
            }
        };

        tracing::debug!(
            headless = options.headless,
            user_agent = %fingerprint.user_agent,
            "browser session launched"
        );

        Ok(Self {
            session: Mutex::new(Some(Session {
                browser,
                _profile: profile,
            })),
            page,
            handler,
            fingerprint,
        })
    }

    /// Fingerprint this session was launched with
    pub fn fingerprint(&self) -> &FingerprintConfig {
        &self.fingerprint
    }

    async fn ensure_open(&self) -> Result<()> {
        if self.session.lock().await.is_none() {
            return Err(BrowserError::Closed);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserEngine {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.ensure_open().await?;
        let domain = extract_domain(url)?;
        tracing::debug!(domain = %domain, url = %url, "navigating");

        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("loading {url} after {timeout:?}")))?
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.ensure_open().await?;
        let quoted = serde_json::to_string(selector)
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;
        let script = format!(
            "(() => {{ const el = document.querySelector({quoted}); \
             if (!el) return false; \
             const style = window.getComputedStyle(el); \
             const rect = el.getBoundingClientRect(); \
             return style.display !== 'none' && style.visibility !== 'hidden' \
             && rect.width > 0 && rect.height > 0; }})()"
        );

        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?
            .into_value::<bool>()
            .map_err(|e| BrowserError::ScriptError(e.to_string()))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.ensure_open().await?;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("click {selector}: {e}")))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.ensure_open().await?;
        let deadline = Instant::now() + timeout;

        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "waiting for {selector} after {timeout:?}"
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn extract_text(&self, selector: &str) -> Result<String> {
        self.ensure_open().await?;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?
            .unwrap_or_default();
        Ok(text.trim().to_string())
    }

    async fn content(&self) -> Result<String> {
        self.ensure_open().await?;
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        let Some(mut session) = self.session.lock().await.take() else {
            return Ok(());
        };

        let closed = session
            .browser
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()));
        if closed.is_ok() {
            let _ = session.browser.wait().await;
        }
        self.handler.abort();
        drop(session);
        closed.map(|_| ())
    }
}

impl Drop for BrowserEngine {
    fn drop(&mut self) {
        // Dropping the Browser kills the child process if close() was never reached
        self.handler.abort();
    }
}

/// Launches a fresh Chromium process for every session
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    options: LaunchOptions,
}

impl ChromiumLauncher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LaunchOptions {
        &self.options
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserActions>> {
        let engine = BrowserEngine::launch(&self.options).await?;
        Ok(Box::new(engine))
    }
}
