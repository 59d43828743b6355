use crate::browser::BrowserSession;
use crate::config::VoyagePriveConfig;
use crate::fetcher::OfferSource;
use crate::models::{VoyagePriveOffer, NOT_AVAILABLE};
use crate::parser;
use crate::selectors::{SiteSelectors, VOYAGE_PRIVE};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

/// What one sale card shows before any follow-up request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingCard {
    pub destination: Option<String>,
    pub hotel_name: Option<String>,
    pub price: Option<String>,
    pub time_remaining: Option<String>,
    pub detail_url: Option<String>,
}

impl ListingCard {
    pub fn is_exclusive(&self, selectors: &SiteSelectors) -> bool {
        self.price.as_deref() == Some(selectors.exclusive_marker)
    }

    /// Price of an exclusive sale, read through `lookup` from the sale page.
    /// A card without a link or a failed lookup gives the placeholder.
    pub fn exclusive_price<F>(&self, lookup: F) -> String
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let Some(url) = self.detail_url.as_deref() else {
            warn!("Exclusive sale without a link: {:?}", self.hotel_name);
            return NOT_AVAILABLE.to_string();
        };

        match lookup(url) {
            Ok(price) => price,
            Err(e) => {
                warn!("Could not read exclusive price: {:#}", e);
                NOT_AVAILABLE.to_string()
            }
        }
    }

    /// Builds the snapshot row. `price` replaces the card price, which is only
    /// a marker on exclusive sales.
    pub fn into_offer(self, now: NaiveDateTime, exclusive: bool, price: Option<String>) -> VoyagePriveOffer {
        let time_remaining = self.time_remaining.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let (start_date, end_date) = parser::offer_window(now, &time_remaining);

        VoyagePriveOffer {
            destination: self.destination.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            hotel_name: self.hotel_name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            price: price
                .or(self.price)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            time_remaining,
            start_date,
            end_date,
            exclusive,
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Failed to parse selector {}: {:?}", css, e))
}

fn element_text(element: ElementRef) -> Option<String> {
    let text = element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope.select(selector).next().and_then(element_text)
}

/// Reads every sale card of the listing page. Promotional cards are skipped;
/// a card without a link still yields an (empty) entry.
pub fn parse_listing_cards(html: &str, selectors: &SiteSelectors, base_url: &str) -> Result<Vec<ListingCard>> {
    let document = Html::parse_document(html);

    let listing_selector = selector(selectors.listing)?;
    let card_selector = selector(selectors.card)?;
    let promo_selector = selector(selectors.promo_card)?;
    let link_selector = selector(selectors.card_link)?;
    let price_selector = selector(selectors.price)?;
    let time_selector = selector(selectors.time_remaining)?;
    let destination_selector = selector(selectors.destination)?;
    let name_selector = selector(selectors.hotel_name)?;

    let listing = document
        .select(&listing_selector)
        .next()
        .context(format!("Listing container not found: {}", selectors.listing))?;

    let base = Url::parse(base_url).context(format!("Invalid base URL: {}", base_url))?;

    let mut cards = Vec::new();
    for card in listing.select(&card_selector) {
        if promo_selector.matches(&card) {
            debug!("Skipping promotional card");
            continue;
        }

        let Some(link) = card.select(&link_selector).next() else {
            cards.push(ListingCard::default());
            continue;
        };

        let detail_url = link
            .value()
            .attr("href")
            .and_then(|href| base.join(href).ok())
            .map(|url| url.to_string());

        cards.push(ListingCard {
            destination: first_text(link, &destination_selector),
            hotel_name: first_text(link, &name_selector),
            price: first_text(link, &price_selector),
            time_remaining: first_text(link, &time_selector),
            detail_url,
        });
    }

    Ok(cards)
}

pub struct VoyagePriveSource {
    config: VoyagePriveConfig,
    selectors: SiteSelectors,
}

impl VoyagePriveSource {
    pub fn new(config: VoyagePriveConfig) -> Self {
        Self {
            config,
            selectors: VOYAGE_PRIVE,
        }
    }

    fn login(&self, session: &BrowserSession) -> Result<()> {
        info!("Opening login page...");
        session.navigate(&self.config.login_url)?;

        if let Err(e) = session.click(self.selectors.cookie_accept) {
            warn!("No cookie banner accepted: {:#}", e);
        }

        info!("Logging in as {}", self.config.credentials.email);
        session.type_into(self.selectors.email_input, &self.config.credentials.email)?;
        session.type_into(self.selectors.password_input, &self.config.credentials.password)?;
        session.click(self.selectors.login_button)?;

        session
            .wait_for(self.selectors.listing)
            .context("Sales listing did not appear after login")?;
        info!("Login successful");
        Ok(())
    }

    /// Exclusive sales hide their price on the listing, so it is read from the
    /// sale page in a separate tab.
    fn detail_price(&self, session: &BrowserSession, url: &str) -> Result<String> {
        let tab = session.open_tab(url)?;
        let element = tab
            .wait_for_element_with_custom_timeout(self.selectors.detail_price, session.options().timeout)
            .context(format!("Price not found on {}", url))?;
        let text = element.get_inner_text()?;

        let price = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if price.is_empty() {
            bail!("Empty price on {}", url);
        }
        Ok(price)
    }
}

impl OfferSource for VoyagePriveSource {
    type Offer = VoyagePriveOffer;

    fn name(&self) -> &str {
        "Voyage Privé"
    }

    fn dataset(&self) -> &str {
        "voyageprive"
    }

    fn fetch_offers(&self) -> Result<Vec<VoyagePriveOffer>> {
        let session = BrowserSession::launch(self.config.browser.clone())?;

        self.login(&session)?;

        info!("Scrolling to load every sale...");
        let rounds = session.scroll_to_bottom()?;
        debug!("Page settled after {} scroll rounds", rounds);

        let removed = session.remove_elements(self.selectors.promo_card)?;
        debug!("Removed {} promotional cards", removed);

        let html = session.page_html()?;
        let cards = parse_listing_cards(&html, &self.selectors, &self.config.base_url)?;
        info!("Found {} sale cards", cards.len());

        let now = Local::now().naive_local();
        let progress = ProgressBar::new(cards.len() as u64);
        progress.set_style(ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?);

        let mut offers = Vec::with_capacity(cards.len());
        for card in cards {
            progress.set_message(card.hotel_name.clone().unwrap_or_default());

            let exclusive = card.is_exclusive(&self.selectors);
            let price = if exclusive {
                Some(card.exclusive_price(|url| self.detail_price(&session, url)))
            } else {
                None
            };
            offers.push(card.into_offer(now, exclusive, price));

            progress.inc(1);
        }
        progress.finish_and_clear();

        let exclusive_count = offers.iter().filter(|offer| offer.exclusive).count();
        info!("Scraped {} sales ({} exclusive)", offers.len(), exclusive_count);
        Ok(offers)
    }
}
