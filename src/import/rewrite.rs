//! Rewrites the free-form titles the bank gives payments into short merchant or payee labels.
//!
//! The rules run in the order of `TITLE_REWRITES`, each one seeing the title produced by the
//! rules before it.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

/// The title the bank gives phone transfers that do not carry the sender and recipient details.
pub const PHONE_TRANSFER_LABEL: &str = "Przelew na telefon BLIK";

/// The title prefix of card payments.
pub const CARD_PAYMENT_PREFIX: &str = "Płatność kartą";

/// Maps a counterparty description prefix to the title that replaces card payment titles.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MerchantAlias {
    pub prefix: String,
    pub title: String,
}

impl MerchantAlias {
    pub fn new(prefix: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            title: title.into(),
        }
    }
}

/// The built-in merchant aliases. The first matching prefix wins.
pub const DEFAULT_MERCHANT_ALIASES: &[(&str, &str)] = &[
    ("WWW.BILET.INTERCITY.PL  WARSZAWA  P", "Bilet IC"),
    ("www.bilet.intercity.pl    Warszawa", "Bilet IC"),
    ("ZABKA", "Żabka"),
    ("JMP S.A. BIEDRONKA", "Biedronka"),
    ("OLX_", "OLX"),
];

pub fn default_merchant_aliases() -> Vec<MerchantAlias> {
    DEFAULT_MERCHANT_ALIASES
        .iter()
        .map(|(prefix, title)| MerchantAlias::new(*prefix, *title))
        .collect()
}

/// What a rewrite rule can see besides the title.
pub struct RewriteContext<'a> {
    pub counterparty: &'a str,
    pub aliases: &'a [MerchantAlias],
}

/// A rule returns the new title, or `None` when it does not apply.
type Rewrite = fn(&str, &RewriteContext<'_>) -> Option<String>;

/// The rewrite rules in the order they are applied.
pub const TITLE_REWRITES: &[(&str, Rewrite)] = &[
    ("phone transfer", phone_transfer),
    ("phone transfer label", phone_transfer_label),
    ("blik payment", blik_payment),
    ("card payment", card_payment),
];

/// Runs every rule of `TITLE_REWRITES` over `title`.
pub fn rewrite_title(title: &str, ctx: &RewriteContext<'_>) -> String {
    let mut current = title.to_string();
    let mut fired = Vec::new();
    for (name, rule) in TITLE_REWRITES {
        if let Some(next) = rule(&current, ctx) {
            fired.push(*name);
            current = next;
        }
    }
    if fired.contains(&"phone transfer") && fired.contains(&"phone transfer label") {
        warn!("Both phone transfer rules rewrote '{title}', the result is '{current}'");
    }
    current
}

fn phone_transfer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\W?Przelew na telefon \+\d{2}x{6}\d{3} (.+) Dla (?:[\w| ]+) Od (?:[\w| ]+)\W?")
            .expect("phone transfer regex")
    })
}

fn blik_payment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"Płatność BLIK \d{2}\.\d{2}\.\d{4} Nr transakcji \d{11} (?:https?://)?(?:www\.)?(\w+)\.\w{2,3}/?",
        )
        .expect("blik payment regex")
    })
}

/// `... Przelew na telefon +48xxxxxx123 <payee> Dla <recipient> Od <sender>` becomes
/// `<payee> <counterparty>`.
fn phone_transfer(title: &str, ctx: &RewriteContext<'_>) -> Option<String> {
    let re = phone_transfer_re();
    if !re.is_match(title) {
        return None;
    }
    let rewritten = re.replace_all(title, |caps: &Captures<'_>| {
        format!("{} {}", &caps[1], ctx.counterparty)
    });
    Some(rewritten.into_owned())
}

/// The bare phone transfer label gets the counterparty appended.
fn phone_transfer_label(title: &str, ctx: &RewriteContext<'_>) -> Option<String> {
    (title == PHONE_TRANSFER_LABEL).then(|| format!("{title} {}", ctx.counterparty))
}

/// `Płatność BLIK 01.10.2024 Nr transakcji 12345678901 https://www.allegro.pl/` becomes
/// `allegro`.
fn blik_payment(title: &str, _ctx: &RewriteContext<'_>) -> Option<String> {
    let re = blik_payment_re();
    if !re.is_match(title) {
        return None;
    }
    Some(re.replace_all(title, "${1}").into_owned())
}

/// Card payments to a known merchant take the merchant alias, other card payments take the
/// counterparty description. A known merchant wins even when the title is not a card payment.
fn card_payment(title: &str, ctx: &RewriteContext<'_>) -> Option<String> {
    if let Some(alias) = ctx
        .aliases
        .iter()
        .find(|a| ctx.counterparty.starts_with(a.prefix.as_str()))
    {
        return Some(alias.title.clone());
    }
    title
        .starts_with(CARD_PAYMENT_PREFIX)
        .then(|| ctx.counterparty.to_string())
}
