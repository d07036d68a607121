//! [`PageSession`] over a W3C WebDriver endpoint (chromedriver, geckodriver).
//!
//! `fantoccini` is async; this session owns a private current-thread tokio
//! runtime and blocks on each command, so callers see a plain synchronous
//! session driven from one thread. The WebDriver session is closed by
//! [`WebDriverSession::close`] or, failing that, on drop.

use std::time::Duration;

use fantoccini::error::CmdError;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use gridscrape_core::{BrowserConfig, BrowserKind};
use serde_json::{json, Map, Value};
use tokio::runtime::Runtime;

use crate::context::RunContext;
use crate::session::{PageSession, SessionError};

/// How to start the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub webdriver_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// `[width, height]` in pixels.
    pub window_size: [u32; 2],
    pub implicit_wait: Duration,
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(browser: &BrowserConfig, headless: bool) -> Self {
        Self {
            webdriver_url: browser.webdriver_url.clone(),
            browser: browser.name,
            headless,
            window_size: browser.window_size,
            implicit_wait: Duration::from_secs(browser.implicitly_wait),
        }
    }

    /// Browser-specific capabilities for the new-session request.
    #[must_use]
    pub fn capabilities(&self) -> Map<String, Value> {
        let [width, height] = self.window_size;
        let mut caps = Map::new();
        match self.browser {
            BrowserKind::Chrome => {
                let mut args = vec![format!("--window-size={width},{height}")];
                if self.headless {
                    args.push("--headless=new".to_string());
                }
                caps.insert("browserName".to_string(), json!("chrome"));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                let args: Vec<&str> = if self.headless { vec!["-headless"] } else { vec![] };
                caps.insert("browserName".to_string(), json!("firefox"));
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

pub struct WebDriverSession {
    runtime: Runtime,
    client: Option<Client>,
    ctx: RunContext,
}

impl WebDriverSession {
    /// Starts a browser session and applies window size and implicit wait.
    /// Lifecycle log lines carry `ctx`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Runtime`] if the internal runtime cannot start.
    /// - [`SessionError::Connect`] if the WebDriver endpoint refuses the session.
    /// - [`SessionError::Command`] if the window or timeouts cannot be set;
    ///   the half-started session is closed before returning.
    pub fn connect(options: &SessionOptions, ctx: &RunContext) -> Result<Self, SessionError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let client = runtime
            .block_on(
                ClientBuilder::native()
                    .capabilities(options.capabilities())
                    .connect(&options.webdriver_url),
            )
            .map_err(|e| SessionError::Connect {
                url: options.webdriver_url.clone(),
                reason: e.to_string(),
            })?;

        let session = Self {
            runtime,
            client: Some(client),
            ctx: ctx.clone(),
        };
        session.configure(options)?;

        tracing::info!(
            run_id = %ctx.run_id,
            category = %ctx.category,
            operation = "connect",
            browser = %options.browser,
            headless = options.headless,
            webdriver_url = %options.webdriver_url,
            "browser session started"
        );
        Ok(session)
    }

    fn configure(&self, options: &SessionOptions) -> Result<(), SessionError> {
        let client = self.client()?;
        let [width, height] = options.window_size;
        self.runtime
            .block_on(client.set_window_size(width, height))
            .map_err(|e| command_error("set_window_size", &e))?;
        let timeouts = TimeoutConfiguration::new(None, None, Some(options.implicit_wait));
        self.runtime
            .block_on(client.update_timeouts(timeouts))
            .map_err(|e| command_error("update_timeouts", &e))
    }

    /// Ends the WebDriver session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Command`] if the driver rejects the request;
    /// the session is considered closed either way.
    pub fn close(mut self) -> Result<(), SessionError> {
        match self.client.take() {
            Some(client) => self
                .runtime
                .block_on(client.close())
                .map_err(|e| command_error("close", &e)),
            None => Ok(()),
        }
    }

    fn client(&self) -> Result<&Client, SessionError> {
        self.client.as_ref().ok_or(SessionError::Command {
            command: "session",
            reason: "session already closed".to_string(),
        })
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = self.runtime.block_on(client.close()) {
                tracing::warn!(
                    run_id = %self.ctx.run_id,
                    category = %self.ctx.category,
                    operation = "close",
                    error = %e,
                    "failed to close browser session on drop"
                );
            }
        }
    }
}

impl PageSession for WebDriverSession {
    fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        let client = self.client()?;
        self.runtime
            .block_on(client.goto(url))
            .map_err(|e| command_error("goto", &e))
    }

    fn page_source(&mut self) -> Result<String, SessionError> {
        let client = self.client()?;
        self.runtime
            .block_on(client.source())
            .map_err(|e| command_error("source", &e))
    }

    fn count(&mut self, selector: &str) -> Result<usize, SessionError> {
        let client = self.client()?;
        self.runtime
            .block_on(client.find_all(Locator::Css(selector)))
            .map(|elements| elements.len())
            .map_err(|e| command_error("find_all", &e))
    }

    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), SessionError> {
        let client = self.client()?;
        match self.runtime.block_on(
            client
                .wait()
                .at_most(timeout)
                .for_element(Locator::Css(selector)),
        ) {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(SessionError::Timeout {
                selector: selector.to_owned(),
                waited: timeout,
            }),
            Err(e) => Err(command_error("wait_for_element", &e)),
        }
    }

    fn is_visible(&mut self, selector: &str) -> Result<bool, SessionError> {
        let client = self.client()?;
        let element = match self.runtime.block_on(client.find(Locator::Css(selector))) {
            Ok(element) => element,
            Err(e) if is_missing_element(&e) => return Ok(false),
            Err(e) => return Err(command_error("find", &e)),
        };
        self.runtime
            .block_on(element.is_displayed())
            .map_err(|e| command_error("is_displayed", &e))
    }

    fn click(&mut self, selector: &str) -> Result<(), SessionError> {
        let client = self.client()?;
        let element = match self.runtime.block_on(client.find(Locator::Css(selector))) {
            Ok(element) => element,
            Err(e) if is_missing_element(&e) => {
                return Err(SessionError::NotFound {
                    selector: selector.to_owned(),
                })
            }
            Err(e) => return Err(command_error("find", &e)),
        };
        self.runtime
            .block_on(element.click())
            .map_err(|e| command_error("click", &e))
    }
}

/// A lookup that matched nothing, as opposed to a driver failure.
fn is_missing_element(err: &CmdError) -> bool {
    err.is_no_such_element()
}

fn command_error(command: &'static str, err: &CmdError) -> SessionError {
    SessionError::Command {
        command,
        reason: err.to_string(),
    }
}
