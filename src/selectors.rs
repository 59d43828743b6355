//! CSS selectors for the Voyage Privé pages.
//!
//! These mirror the site's current markup. When the site changes, this table is
//! the only place that needs editing.

#[derive(Debug, Clone, Copy)]
pub struct SiteSelectors {
    pub cookie_accept: &'static str,
    pub email_input: &'static str,
    pub password_input: &'static str,
    pub login_button: &'static str,
    /// Container of the "on sale now" cards, present once logged in.
    pub listing: &'static str,
    pub card: &'static str,
    /// Promotional cards mixed in with the sales.
    pub promo_card: &'static str,
    pub card_link: &'static str,
    pub price: &'static str,
    pub time_remaining: &'static str,
    pub destination: &'static str,
    pub hotel_name: &'static str,
    pub detail_price: &'static str,
    /// Price text shown instead of an amount on members-only sales.
    pub exclusive_marker: &'static str,
}

pub const VOYAGE_PRIVE: SiteSelectors = SiteSelectors {
    cookie_accept: "#cookieBanner > div > div.BannerContainer__buttons > button.Button.Button--light.Button--accept",
    email_input: "#reactLogin > div > div > div.Login__content > form > div > div > div:nth-child(1) > input[type=email]",
    password_input: "#reactLogin > div > div > div.Login__content > form > div > div > div.Login__line.passwordContainer > div > input",
    login_button: "#reactLogin > div > div > div.Login__content > form > div > div > div.Login__line.Login__line--spaced > button",
    listing: "#section-now > div",
    card: "article",
    promo_card: "article[id*='push-promo']",
    card_link: "a",
    price: "div.sale_price",
    time_remaining: "div.sale-time-remaining.specific-not-near",
    destination: "span.sale-destination",
    hotel_name: "span.hotel-name",
    detail_price: ".offer-price.details-price.euro",
    exclusive_marker: "EXCLUSIF",
};
