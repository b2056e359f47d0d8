//! Home page model.
//!
//! One stable contract between scenarios and the home page's DOM surface:
//! every selector lives here and nowhere else, so a DOM change is edited in
//! exactly one place. The model is stateless; accessors hand out locator
//! descriptions that re-query the live page on every use.

use crate::browser::Page;
use crate::checks::Verification;
use crate::config::HarnessConfig;
use crate::fixture::FixtureStore;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::SondearResult;

/// Page object for the sandbox home page.
///
/// Construct one per test run with [`HomePage::new`]; nothing here is a
/// shared singleton.
#[derive(Debug, Clone)]
pub struct HomePage {
    hero_title: Locator,
    hero_subtitle: Locator,
    theme_toggle: Locator,
    card_ecommerce: Locator,
    start_shopping_link: Locator,
    card_playground: Locator,
    start_playground_link: Locator,
}

impl HomePage {
    /// Create the home page model
    #[must_use]
    pub fn new() -> Self {
        Self {
            hero_title: Locator::test_id("hero-title"),
            hero_subtitle: Locator::test_id("hero-subtitle"),
            theme_toggle: Locator::test_id("theme-toggle"),
            card_ecommerce: Locator::test_id("card-ecommerce"),
            start_shopping_link: Locator::test_id("card-ecommerce-link"),
            card_playground: Locator::test_id("card-playground"),
            start_playground_link: Locator::test_id("card-playground-link"),
        }
    }

    // Locator accessors

    /// The hero title
    #[must_use]
    pub const fn hero_title(&self) -> &Locator {
        &self.hero_title
    }

    /// The hero subtitle
    #[must_use]
    pub const fn hero_subtitle(&self) -> &Locator {
        &self.hero_subtitle
    }

    /// The light/dark theme toggle
    #[must_use]
    pub const fn theme_toggle(&self) -> &Locator {
        &self.theme_toggle
    }

    /// The e-commerce demo card
    #[must_use]
    pub const fn card_ecommerce(&self) -> &Locator {
        &self.card_ecommerce
    }

    /// The "start shopping" link inside the e-commerce card
    #[must_use]
    pub const fn start_shopping_link(&self) -> &Locator {
        &self.start_shopping_link
    }

    /// The playground demo card
    #[must_use]
    pub const fn card_playground(&self) -> &Locator {
        &self.card_playground
    }

    /// The "start playground" link inside the playground card
    #[must_use]
    pub const fn start_playground_link(&self) -> &Locator {
        &self.start_playground_link
    }

    // Actions

    /// Navigate to the home page
    ///
    /// # Errors
    ///
    /// Returns a `Navigation` error when the load fails
    pub async fn visit(&self, page: &mut Page, config: &HarnessConfig) -> SondearResult<()> {
        page.goto(&config.page_url(self.url_pattern())).await
    }

    /// Click the e-commerce "start shopping" link
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the link never becomes actionable
    pub async fn click_get_started(&self, page: &mut Page) -> SondearResult<()> {
        page.click(&self.start_shopping_link).await
    }

    /// Click the playground "start" link
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the link never becomes actionable
    pub async fn click_get_started_playground(&self, page: &mut Page) -> SondearResult<()> {
        page.click(&self.start_playground_link).await
    }

    /// Toggle the color theme
    ///
    /// Two consecutive invocations return the page to its original theme.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the toggle never becomes actionable
    pub async fn click_toggle_theme(&self, page: &mut Page) -> SondearResult<()> {
        page.click(&self.theme_toggle).await
    }

    // Grouped validation

    /// Verify the home page's visible surface as one sequential pipeline.
    ///
    /// Steps, in order: hero title visible; hero subtitle visible; hero
    /// subtitle text exactly equals the fixture value; theme toggle visible;
    /// both card/link pairs visible. The first failing step halts the
    /// pipeline; the returned [`Verification`] aggregates every executed
    /// step. A fixture that cannot be loaded at all is an error, not a
    /// failed step.
    ///
    /// # Errors
    ///
    /// Returns a `Fixture` error when the expected subtitle cannot be loaded
    pub async fn verify_page_elements(
        &self,
        page: &Page,
        fixtures: &FixtureStore,
    ) -> SondearResult<Verification> {
        let mut v = Verification::new("home page elements");

        if !v.record("hero title visible", page.wait_for_visible(&self.hero_title).await) {
            return Ok(v);
        }

        if !v.record(
            "hero subtitle visible",
            page.wait_for_visible(&self.hero_subtitle).await,
        ) {
            return Ok(v);
        }

        let expected = fixtures.text("texts", "home_page.subtitle").await?;
        match page.text_content(&self.hero_subtitle).await {
            Ok(actual) => {
                if !v.record_eq("hero subtitle text", &expected, &actual) {
                    return Ok(v);
                }
            }
            Err(e) => {
                let _ = v.record("hero subtitle text", Err(e));
                return Ok(v);
            }
        }

        for (name, locator) in [
            ("theme toggle visible", &self.theme_toggle),
            ("ecommerce card visible", &self.card_ecommerce),
            ("start shopping link visible", &self.start_shopping_link),
            ("playground card visible", &self.card_playground),
            ("start playground link visible", &self.start_playground_link),
        ] {
            if !v.record(name, page.wait_for_visible(locator).await) {
                return Ok(v);
            }
        }

        Ok(v)
    }
}

impl Default for HomePage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageObject for HomePage {
    fn url_pattern(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "home page"
    }
}


#[cfg(all(test, not(feature = "browser")))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::browser::MockElement;
    use crate::checks::CheckStatus;
    use crate::result::SondearError;
    use std::io::Write;

    const SUBTITLE: &str = "Explore our demo projects";

    fn rendered_home_page() -> Page {
        let mut page = Page::new(1920, 1080);
        page.insert_element("hero-title", MockElement::visible("QA Automation Sandbox"));
        page.insert_element("hero-subtitle", MockElement::visible(SUBTITLE));
        page.insert_element("theme-toggle", MockElement::visible("Toggle theme"));
        page.insert_element("card-ecommerce", MockElement::visible("E-commerce demo"));
        page.insert_element("card-ecommerce-link", MockElement::visible("Start shopping"));
        page.insert_element("card-playground", MockElement::visible("Playground demo"));
        page.insert_element("card-playground-link", MockElement::visible("Start playground"));
        page
    }

    fn fixtures_with_subtitle(subtitle: &str) -> (tempfile::TempDir, FixtureStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("texts.json")).unwrap();
        write!(
            file,
            r#"{{"home_page": {{"title": "QA Automation Sandbox", "subtitle": {subtitle:?}}}}}"#
        )
        .unwrap();
        let store = FixtureStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_visit_navigates_to_base_url() {
        let config = HarnessConfig::default();
        let home = HomePage::new();
        let mut page = Page::new(1920, 1080);

        home.visit(&mut page, &config).await.unwrap();
        assert_eq!(
            page.current_url(),
            "https://qa-automation-sandbox.vercel.app/"
        );
        assert!(home.matches_url(page.current_url()));
    }

    #[tokio::test]
    async fn test_verify_passes_on_rendered_page() {
        let home = HomePage::new();
        let page = rendered_home_page();
        let (_dir, fixtures) = fixtures_with_subtitle(SUBTITLE);

        let v = home.verify_page_elements(&page, &fixtures).await.unwrap();
        assert!(v.passed());
        assert_eq!(v.checks().len(), 8);
        assert!(v.to_result().is_ok());
    }

    #[tokio::test]
    async fn test_changed_fixture_fails_exactly_at_subtitle_text() {
        let home = HomePage::new();
        let page = rendered_home_page();
        let (_dir, fixtures) = fixtures_with_subtitle("A different subtitle");

        let v = home.verify_page_elements(&page, &fixtures).await.unwrap();
        assert!(!v.passed());

        // The two visibility steps before it must have passed; nothing after
        // the failing step may have run.
        let failure = v.failure().unwrap();
        assert_eq!(failure.name, "hero subtitle text");
        assert_eq!(v.checks().len(), 3);
        assert!(v.checks()[..2]
            .iter()
            .all(|c| c.status == CheckStatus::Passed));
    }

    #[tokio::test]
    async fn test_missing_title_halts_before_fixture_load() {
        let home = HomePage::new();
        let mut page = rendered_home_page();
        page.insert_element("hero-title", MockElement::hidden("QA Automation Sandbox"));
        // The fixture file does not exist; the pipeline must halt before
        // ever needing it.
        let empty = tempfile::tempdir().unwrap();
        let fixtures = FixtureStore::new(empty.path());

        let v = home.verify_page_elements(&page, &fixtures).await.unwrap();
        assert!(!v.passed());
        assert_eq!(v.failure().unwrap().name, "hero title visible");
        assert_eq!(v.checks().len(), 1);
    }

    #[tokio::test]
    async fn test_hidden_theme_toggle_fails_after_subtitle_steps() {
        let home = HomePage::new();
        let mut page = rendered_home_page();
        page.insert_element("theme-toggle", MockElement::hidden("Toggle theme"));
        let (_dir, fixtures) = fixtures_with_subtitle(SUBTITLE);

        let v = home.verify_page_elements(&page, &fixtures).await.unwrap();
        assert!(!v.passed());
        assert_eq!(v.failure().unwrap().name, "theme toggle visible");
        assert_eq!(v.checks().len(), 4);
    }

    #[tokio::test]
    async fn test_click_get_started_requires_visible_link() {
        let home = HomePage::new();
        let mut page = rendered_home_page();

        home.click_get_started(&mut page).await.unwrap();
        assert_eq!(page.clicks(), ["[data-testid=\"card-ecommerce-link\"]"]);

        page.insert_element("card-ecommerce-link", MockElement::hidden("Start shopping"));
        let result = home.click_get_started(&mut page).await;
        assert!(matches!(result, Err(SondearError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_click_get_started_playground() {
        let home = HomePage::new();
        let mut page = rendered_home_page();

        home.click_get_started_playground(&mut page).await.unwrap();
        assert_eq!(page.clicks(), ["[data-testid=\"card-playground-link\"]"]);
    }

    #[tokio::test]
    async fn test_toggle_theme_clicks_the_toggle() {
        let home = HomePage::new();
        let mut page = rendered_home_page();

        home.click_toggle_theme(&mut page).await.unwrap();
        home.click_toggle_theme(&mut page).await.unwrap();
        assert_eq!(page.clicks().len(), 2);
    }

    #[test]
    fn test_home_page_is_a_per_run_factory() {
        // Two runs get independent models; equality of the contract, not
        // shared identity.
        let a = HomePage::new();
        let b = HomePage::new();
        assert_eq!(a.hero_title().describe(), b.hero_title().describe());
        assert_eq!(a.url_pattern(), "/");
        assert_eq!(b.page_name(), "home page");
    }
}
