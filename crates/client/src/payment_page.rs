//! Bridge between the embedded payment page and the app.
//!
//! The provider's checkout runs in a web view. Every navigation is reported
//! to [`PaymentPage::on_navigation`]; the backend's return URLs close the
//! page, everything else loads normally.

use tracing::info;

use crate::navigation::Route;

/// Path fragment of the backend's success return URL.
pub const SUCCESS_MARKER: &str = "/payment/success";

/// Path fragment of the backend's failure return URL.
pub const FAILURE_MARKER: &str = "/payment/failed";

/// What to do after a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentNavigation {
    /// Let the page load.
    Continue,
    /// Payment completed; close and show the order list.
    Succeeded,
    /// Payment failed or was abandoned; close and go back.
    Failed,
}

impl PaymentNavigation {
    /// Route to show after the page closes.
    #[must_use]
    pub const fn route(self) -> Option<Route> {
        match self {
            Self::Continue => None,
            Self::Succeeded => Some(Route::Orders),
            Self::Failed => Some(Route::Back),
        }
    }
}

/// An open payment page.
#[derive(Debug, Clone)]
pub struct PaymentPage {
    url: String,
    closed: bool,
}

impl PaymentPage {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            closed: false,
        }
    }

    /// The page the web view starts on.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle a navigation to `url`. Events after the page has closed are
    /// ignored.
    pub fn on_navigation(&mut self, url: &str) -> PaymentNavigation {
        if self.closed {
            return PaymentNavigation::Continue;
        }

        let outcome = if url.contains(SUCCESS_MARKER) {
            PaymentNavigation::Succeeded
        } else if url.contains(FAILURE_MARKER) {
            PaymentNavigation::Failed
        } else {
            PaymentNavigation::Continue
        };

        if outcome != PaymentNavigation::Continue {
            info!(outcome = ?outcome, "Payment page closed");
            self.closed = true;
        }
        outcome
    }
}
