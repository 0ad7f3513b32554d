//! Extraction of the credential form target from the portal's login page.

use crate::error::PortalError;
use scraper::{Html, Selector};

/// Creates a CSS selector matching the element with the given id.
///
/// This is a wrapper around scraper's Selector::parse that converts
/// parsing errors into our error type; an id that cannot form a selector
/// cannot match anything on the page either.
fn id_selector(element_id: &str) -> Result<Selector, PortalError> {
    Selector::parse(&format!("#{}", element_id))
        .map_err(|_| PortalError::login_form_not_found(element_id))
}

/// Returns the `action` attribute of the form with id `element_id`.
///
/// # Errors
///
/// `LoginFormNotFound` when the element is absent or its action is empty.
pub fn extract_form_action(page: &str, element_id: &str) -> Result<String, PortalError> {
    let document = Html::parse_document(page);
    let selector = id_selector(element_id)?;

    document
        .select(&selector)
        .next()
        .and_then(|form| form.value().attr("action"))
        .map(str::trim)
        .filter(|action| !action.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PortalError::login_form_not_found(element_id))
}
