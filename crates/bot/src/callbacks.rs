//! Callback payloads carried by inline buttons.

use std::fmt;

use nightleech_core::Transition;

/// Everything a button can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Menu,
    Downloads,
    Status,
    /// Page counter button; does nothing.
    Noop,
    Transfer(String),
    Delete(String),
    Navigate(Transition),
}

impl Callback {
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "menu" => return Some(Callback::Menu),
            "downloads" => return Some(Callback::Downloads),
            "status" => return Some(Callback::Status),
            "noop" => return Some(Callback::Noop),
            _ => {}
        }

        if let Some(hash) = payload.strip_prefix("dl_") {
            return (!hash.is_empty()).then(|| Callback::Transfer(hash.to_string()));
        }
        if let Some(hash) = payload.strip_prefix("del_") {
            return (!hash.is_empty()).then(|| Callback::Delete(hash.to_string()));
        }

        Transition::parse(payload).map(Callback::Navigate)
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Menu => f.write_str("menu"),
            Callback::Downloads => f.write_str("downloads"),
            Callback::Status => f.write_str("status"),
            Callback::Noop => f.write_str("noop"),
            Callback::Transfer(hash) => write!(f, "dl_{}", hash),
            Callback::Delete(hash) => write!(f, "del_{}", hash),
            Callback::Navigate(transition) => write!(f, "{}", transition),
        }
    }
}
