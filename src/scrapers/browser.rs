use crate::scrapers::calendar::{DAY_BUTTON, MONTH_CAPTION, NEXT_MONTH, OPEN_CALENDAR};
use crate::scrapers::traits::CalendarDriver;
use crate::scrapers::types::ScrapeConfig;
use anyhow::{anyhow, Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Resort date picker driven through headless Chrome
pub struct ChromeCalendar {
    // Dropping the browser shuts the Chrome process down
    _browser: Browser,
    tab: Arc<Tab>,
    timeout: Duration,
    settle: Duration,
}

impl ChromeCalendar {
    /// Launch Chrome and open the tab used for the whole run
    pub fn launch(config: &ScrapeConfig) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options)
            .context("Failed to launch Chrome browser")?;

        let tab = browser.new_tab().context("Failed to open browser tab")?;
        tab.set_default_timeout(config.element_timeout());

        Ok(Self {
            _browser: browser,
            tab,
            timeout: config.element_timeout(),
            settle: config.settle(),
        })
    }

    fn click(&self, selector: &str) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, self.timeout)
            .with_context(|| format!("Element '{}' not found", selector))?
            .click()
            .with_context(|| format!("Element '{}' not clickable", selector))?;
        Ok(())
    }

    fn page_html(&self) -> Result<String> {
        let result = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to read page HTML")?;

        result
            .value
            .as_ref()
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Page returned no HTML"))
    }
}

impl CalendarDriver for ChromeCalendar {
    fn open_resort(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?;
        self.tab.wait_until_navigated().context("Page did not finish loading")?;
        thread::sleep(self.settle);

        self.click(OPEN_CALENDAR)?;
        thread::sleep(self.settle);
        Ok(())
    }

    fn month_caption(&mut self) -> Result<String> {
        self.tab
            .wait_for_element_with_custom_timeout(MONTH_CAPTION, self.timeout)
            .context("Month caption not found")?
            .get_inner_text()
            .context("Failed to read month caption")
    }

    fn month_days(&mut self) -> Result<String> {
        self.tab
            .wait_for_element_with_custom_timeout(DAY_BUTTON, self.timeout)
            .context("No enabled days in month")?;

        let html = self.page_html()?;
        debug!("Captured {} bytes of calendar HTML", html.len());
        Ok(html)
    }

    fn next_month(&mut self) -> Result<()> {
        self.click(NEXT_MONTH)?;
        thread::sleep(self.settle);
        Ok(())
    }
}
