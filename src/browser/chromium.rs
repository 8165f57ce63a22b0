//! Chromium-backed directory search session

use crate::browser::{BrowserError, SearchSession};
use crate::config::{BrowserConfig, DirectoryConfig};
use crate::crawler::extract_result_links;
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig as LaunchConfig, Page};
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Directory search driven through one headless Chromium tab
pub struct ChromiumDirectory {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    directory: DirectoryConfig,
    timeout_secs: u64,
    closed: bool,
}

impl ChromiumDirectory {
    /// Launches Chromium and opens the tab used for every search
    pub async fn open(
        browser_config: &BrowserConfig,
        directory: &DirectoryConfig,
    ) -> Result<Self, BrowserError> {
        let timeout = Duration::from_secs(browser_config.navigation_timeout_secs);

        let mut builder = LaunchConfig::builder()
            .no_sandbox()
            .request_timeout(timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if !browser_config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &browser_config.executable {
            builder = builder.chrome_executable(executable);
        }
        let launch_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::Launch(format!("failed to open tab: {}", e)));
            }
        };

        tracing::info!(
            "Browser session started (headless: {})",
            browser_config.headless
        );

        Ok(Self {
            browser,
            page,
            handler,
            directory: directory.clone(),
            timeout_secs: browser_config.navigation_timeout_secs,
            closed: false,
        })
    }

    /// Runs `fut` under the navigation timeout
    async fn within<T, F>(&self, action: &str, fut: F) -> Result<T, BrowserError>
    where
        F: Future<Output = Result<T, BrowserError>>,
    {
        tokio::time::timeout(Duration::from_secs(self.timeout_secs), fut)
            .await
            .map_err(|_| BrowserError::Timeout {
                action: action.to_string(),
                secs: self.timeout_secs,
            })?
    }

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.within("navigating", async {
            self.page
                .goto(url)
                .await
                .map(|_| ())
                .map_err(|e| BrowserError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
        })
        .await
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.within("reading page content", async {
            self.page
                .content()
                .await
                .map_err(|e| BrowserError::Protocol(e.to_string()))
        })
        .await
    }

    /// Fills the search form and waits for the results page
    async fn submit_query(&self, query: &str) -> Result<(), BrowserError> {
        let input_selector = &self.directory.search_input_selector;
        let button_selector = &self.directory.search_button_selector;

        self.within("typing the search query", async {
            let input = self.page.find_element(input_selector.as_str()).await.map_err(|_| {
                BrowserError::ElementNotFound {
                    selector: input_selector.clone(),
                }
            })?;
            input
                .click()
                .await
                .map_err(|e| BrowserError::Protocol(e.to_string()))?;
            input
                .type_str(query)
                .await
                .map_err(|e| BrowserError::Protocol(e.to_string()))?;
            Ok::<(), BrowserError>(())
        })
        .await?;

        self.within("submitting the search", async {
            let button = self.page.find_element(button_selector.as_str()).await.map_err(|_| {
                BrowserError::ElementNotFound {
                    selector: button_selector.clone(),
                }
            })?;
            button
                .click()
                .await
                .map_err(|e| BrowserError::Protocol(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| BrowserError::Navigation {
                    url: self.directory.search_url.clone(),
                    message: e.to_string(),
                })?;
            Ok::<(), BrowserError>(())
        })
        .await
    }

    async fn current_url(&self) -> Result<Url, BrowserError> {
        let current = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?
            .unwrap_or_else(|| self.directory.search_url.clone());
        Url::parse(&current).map_err(|e| BrowserError::Navigation {
            url: current.clone(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SearchSession for ChromiumDirectory {
    async fn search(&mut self, query: &str) -> Result<Vec<String>, BrowserError> {
        self.goto(&self.directory.search_url).await?;
        self.submit_query(query).await?;

        let results_markup = self.content().await?;
        let base = self.current_url().await?;
        let results_selector = &self.directory.results_selector;
        let links = extract_result_links(&results_markup, &base, results_selector)?
            .ok_or_else(|| BrowserError::ElementNotFound {
                selector: results_selector.clone(),
            })?;

        tracing::debug!("Search for {} returned {} result links", query, links.len());

        let mut pages = Vec::with_capacity(links.len());
        for link in &links {
            self.goto(link.as_str()).await?;
            pages.push(self.content().await?);
        }

        Ok(pages)
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Protocol(e.to_string()));
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();

        tracing::info!("Browser session closed");
        result
    }
}

impl Drop for ChromiumDirectory {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
