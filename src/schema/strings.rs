//! Format checks for format-constrained string fields.

use crate::error::StringCheck;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};

static CUID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^c[^\s-]{8,}$").expect("cuid pattern is valid"));

static CUID2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*$").expect("cuid2 pattern is valid"));

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern is valid")
});

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\p{Extended_Pictographic}|\p{Emoji_Component})+$")
        .expect("emoji pattern is valid")
});

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:(//[^\s/?#]+[^\s]*|[^\s/][^\s]*)$")
        .expect("url pattern is valid")
});

/// IP version pin for `ip` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

/// Format a string field must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Cuid,
    Cuid2,
    Email,
    Emoji,
    Ip(Option<IpVersion>),
    Url,
    Uuid,
}

impl StringFormat {
    pub fn matches(&self, s: &str) -> bool {
        match self {
            StringFormat::Cuid => CUID.is_match(s),
            StringFormat::Cuid2 => CUID2.is_match(s),
            StringFormat::Email => is_email(s),
            StringFormat::Emoji => EMOJI.is_match(s),
            StringFormat::Ip(version) => is_ip(s, *version),
            StringFormat::Url => URL.is_match(s),
            // Only the hyphenated form is accepted
            StringFormat::Uuid => s.len() == 36 && uuid::Uuid::try_parse(s).is_ok(),
        }
    }

    pub(crate) fn check(&self) -> StringCheck {
        match self {
            StringFormat::Cuid => StringCheck::Cuid,
            StringFormat::Cuid2 => StringCheck::Cuid2,
            StringFormat::Email => StringCheck::Email,
            StringFormat::Emoji => StringCheck::Emoji,
            StringFormat::Ip(_) => StringCheck::Ip,
            StringFormat::Url => StringCheck::Url,
            StringFormat::Uuid => StringCheck::Uuid,
        }
    }
}

fn is_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && EMAIL.is_match(s)
}

fn is_ip(s: &str, version: Option<IpVersion>) -> bool {
    let v4 = || s.parse::<Ipv4Addr>().is_ok();
    let v6 = || s.parse::<Ipv6Addr>().is_ok();
    match version {
        Some(IpVersion::V4) => v4(),
        Some(IpVersion::V6) => v6(),
        None => v4() || v6(),
    }
}
