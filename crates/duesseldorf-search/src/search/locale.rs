use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Locales the search endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    /// Map the host's locale onto a supported one, defaulting to German.
    pub fn from_host(locale: &str) -> Self {
        match locale {
            "en" => Self::En,
            _ => Self::De,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host application's current locale, read on every request.
pub trait LocaleSource: Send + Sync {
    fn locale(&self) -> String;
}

impl LocaleSource for String {
    fn locale(&self) -> String {
        self.clone()
    }
}

impl LocaleSource for &'static str {
    fn locale(&self) -> String {
        (*self).to_owned()
    }
}

/// For hosts that switch language at runtime.
impl LocaleSource for RwLock<String> {
    fn locale(&self) -> String {
        self.read().clone()
    }
}

impl<T: LocaleSource + ?Sized> LocaleSource for Arc<T> {
    fn locale(&self) -> String {
        (**self).locale()
    }
}
