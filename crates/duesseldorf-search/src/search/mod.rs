//! Search and suggestion against the municipal search endpoint.
//!
//! [`SearchAdapter`] owns the field mapping, the source CRS and the single
//! cancellation token for its outstanding request. The host supplies its
//! current language through a [`LocaleSource`].

mod adapter;
mod locale;

pub use adapter::{MIN_SUGGEST_LEN, SearchAdapter};
pub use locale::{Locale, LocaleSource};
