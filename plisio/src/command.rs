//! API commands and their URL paths.

use std::fmt;

/// A Plisio API command, i.e. the path appended to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `balances`: wallet balance of one cryptocurrency.
    Balances,
    /// `shops`: shop settings.
    Shops,
    /// `currencies/{source}`: enabled currencies priced in `source`.
    Currencies(String),
    /// `invoices/new`: create an invoice.
    NewInvoice,
}

impl Command {
    /// Path segments of the command, unencoded.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Balances => vec!["balances"],
            Self::Shops => vec!["shops"],
            Self::Currencies(source) => vec!["currencies", source.as_str()],
            Self::NewInvoice => vec!["invoices", "new"],
        }
    }

    /// Static label used in logs and error context.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Balances => "GET balances",
            Self::Shops => "GET shops",
            Self::Currencies(_) => "GET currencies",
            Self::NewInvoice => "GET invoices/new",
        }
    }

    /// Whether the command needs a secret key.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Currencies(_))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_vendor_commands() {
        assert_eq!(Command::Balances.to_string(), "balances");
        assert_eq!(Command::Shops.to_string(), "shops");
        assert_eq!(Command::Currencies("EUR".into()).to_string(), "currencies/EUR");
        assert_eq!(Command::NewInvoice.to_string(), "invoices/new");
    }

    #[test]
    fn only_currencies_is_a_guest_command() {
        assert!(Command::Balances.requires_auth());
        assert!(Command::Shops.requires_auth());
        assert!(Command::NewInvoice.requires_auth());
        assert!(!Command::Currencies("USD".into()).requires_auth());
    }
}
