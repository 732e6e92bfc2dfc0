//! Campaign-page field extraction.
//!
//! Parses the HTML of a single campaign page into a [`CampaignRecord`].
//! Selectors are anchored on the platform's campaign-page markup: the title
//! heading, the description blocks, the progress meter (raised amount and
//! goal line), and the donation lockup entries.
//!
//! Missing fields never fail the whole record: text fields come back empty,
//! amounts come back [`Amount::Unknown`], and each miss is logged as a
//! field-level warning. A record with every field unknown is still `Ok`;
//! only an empty document is an [`ExtractError`].

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::models::{Amount, CampaignRecord, Donation};
use crate::utils::{remove_duplicate_words, truncate_for_log};

/// Donation lists on a page can run long; only the entries the page serves
/// inline are worth keeping.
pub const MAX_DONATIONS: usize = 10;

static TITLE: Lazy<Selector> = Lazy::new(|| sel("h1.p-campaign-title"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| sel("div.campaign-description_content__C1C_5"));
static PROGRESS_METER: Lazy<Selector> =
    Lazy::new(|| sel("div.progress-meter_progressMeterHeading__A6Slt"));
static RAISED: Lazy<Selector> = Lazy::new(|| sel("div.progress-meter_largeType__L_4O8"));
static GOAL: Lazy<Selector> = Lazy::new(|| sel("span.hrt-text-body-sm.hrt-text-gray"));
static DONATION: Lazy<Selector> = Lazy::new(|| sel("div.hrt-avatar-lockup-content"));
static DONATION_NAME: Lazy<Selector> = Lazy::new(|| sel("div"));
static DONATION_AMOUNT: Lazy<Selector> = Lazy::new(|| sel("span.hrt-font-bold"));
static DONATION_WHEN: Lazy<Selector> = Lazy::new(|| sel("span.hrt-text-body-sm"));

/// First run of digits with embedded separators, e.g. "12,345" in "$12,345".
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9][0-9.,]*").expect("valid amount regex")
});

/// Combined progress text, e.g. "$12,345 raised of $20,000 goal". Some page
/// variants render the whole meter as one string instead of separate nodes.
static RAISED_OF_GOAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([$€£]?[0-9][0-9.,]*[KM]?)\s+raised\s+of\s+([$€£]?[0-9][0-9.,]*[KM]?)\s+goal")
        .expect("valid progress regex")
});

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Extract a [`CampaignRecord`] from campaign-page HTML.
///
/// # Arguments
///
/// * `url` - The page's source URL, stamped onto the record
/// * `html` - The raw page HTML
///
/// # Errors
///
/// [`ExtractError::EmptyDocument`] when `html` is empty or whitespace-only.
/// Anything parseable yields a record, however sparse.
pub fn extract(url: &str, html: &str) -> Result<CampaignRecord, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }
    let document = Html::parse_document(html);

    let title = match document.select(&TITLE).next() {
        Some(el) => remove_duplicate_words(&element_text(el)),
        None => {
            warn!(%url, "No campaign title found");
            String::new()
        }
    };

    let description_parts: Vec<String> =
        document.select(&DESCRIPTION).map(element_text).collect();
    let description = if description_parts.is_empty() {
        warn!(%url, "No campaign description found");
        String::new()
    } else {
        remove_duplicate_words(&description_parts.join("\n"))
    };

    let (amount_raised, goal) = extract_progress(url, &document);
    let donations = extract_donations(&document);

    debug!(
        %url,
        title = %truncate_for_log(&title, 80),
        ?amount_raised,
        ?goal,
        donations = donations.len(),
        "Extracted campaign record"
    );

    Ok(CampaignRecord {
        source_url: url.to_string(),
        title,
        description,
        amount_raised,
        goal,
        donations,
        scraped_at: Utc::now(),
    })
}

/// Pull the raised amount and goal out of the progress meter.
///
/// Prefers the dedicated child nodes; falls back to the combined
/// "X raised of Y goal" text when a page variant renders the meter as a
/// single string.
fn extract_progress(url: &str, document: &Html) -> (Amount, Amount) {
    let Some(meter) = document.select(&PROGRESS_METER).next() else {
        warn!(%url, "No progress meter found");
        return (Amount::Unknown, Amount::Unknown);
    };

    let raised_node = meter.select(&RAISED).next().map(element_text);
    let goal_node = meter.select(&GOAL).next().map(element_text);

    if raised_node.is_some() || goal_node.is_some() {
        let raised = match raised_node {
            Some(text) => parse_amount(&text),
            None => {
                warn!(%url, "No raised amount in progress meter");
                Amount::Unknown
            }
        };
        let goal = match goal_node {
            Some(text) => parse_amount(&text),
            None => {
                warn!(%url, "No goal line in progress meter");
                Amount::Unknown
            }
        };
        return (raised, goal);
    }

    let text = element_text(meter);
    if let Some(caps) = RAISED_OF_GOAL_RE.captures(&text) {
        return (parse_amount(&caps[1]), parse_amount(&caps[2]));
    }

    warn!(%url, meter_text = %truncate_for_log(&text, 80), "Unrecognized progress meter layout");
    (Amount::Unknown, Amount::Unknown)
}

/// Collect up to [`MAX_DONATIONS`] donation entries in page order.
fn extract_donations(document: &Html) -> Vec<Donation> {
    document
        .select(&DONATION)
        .take(MAX_DONATIONS)
        .map(|entry| {
            let donor_name = entry
                .select(&DONATION_NAME)
                .next()
                .map(element_text)
                .unwrap_or_default();
            let amount = entry
                .select(&DONATION_AMOUNT)
                .next()
                .map(|el| parse_amount(&element_text(el)))
                .unwrap_or(Amount::Unknown);
            let when = entry
                .select(&DONATION_WHEN)
                .next()
                .map(element_text)
                .unwrap_or_default();
            Donation {
                donor_name,
                amount,
                when,
            }
        })
        .collect()
}

/// Parse a currency display string into an [`Amount`].
///
/// Strips the currency symbol, finds the first digit run, and drops
/// thousands separators. `"$12,345"` parses to `12345`; text with no
/// usable number is [`Amount::Unknown`], never zero.
pub fn parse_amount(text: &str) -> Amount {
    let Some(m) = AMOUNT_RE.find(text) else {
        warn!(text = %truncate_for_log(text, 40), "No numeric amount in text");
        return Amount::Unknown;
    };
    let cleaned = m.as_str().replace(',', "").trim_end_matches('.').to_string();

    let multiplier = match text[m.end()..].chars().next() {
        Some('K') | Some('k') => 1_000.0,
        Some('M') => 1_000_000.0,
        _ => 1.0,
    };

    match cleaned.parse::<f64>() {
        Ok(v) => Amount::Known(v * multiplier),
        Err(_) => {
            warn!(text = %truncate_for_log(text, 40), "Unparseable amount");
            Amount::Unknown
        }
    }
}

/// Flatten an element's text nodes into one whitespace-normalized string.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>campaign</title></head><body>
<h1 class="hrt-mb-0 p-campaign-title">Help Help Rebuild Rebuild the the Library Library</h1>
<div class="progress-meter_progressMeterHeading__A6Slt">
  <div class="hrt-disp-inline progress-meter_largeType__L_4O8">$12,345</div>
  <span class="hrt-text-body-sm hrt-text-gray">raised of $20,000 goal</span>
</div>
<div class="campaign-description_content__C1C_5">Our Our town town library library burned down.</div>
<div class="campaign-description_content__C1C_5">Every dollar helps.</div>
<div class="hrt-avatar-lockup-content">
  <div>Jane Doe</div>
  <div><span class="hrt-font-bold">$50</span> <span class="hrt-text-body-sm">2 d</span></div>
</div>
<div class="hrt-avatar-lockup-content">
  <div>Anonymous</div>
  <div><span class="hrt-font-bold">$5</span> <span class="hrt-text-body-sm">6 d</span></div>
</div>
</body></html>"#;

    #[test]
    fn test_extract_full_page() {
        let record = extract("https://example.com/f/library", FULL_PAGE).unwrap();
        assert_eq!(record.source_url, "https://example.com/f/library");
        assert_eq!(record.title, "Help Rebuild the Library");
        assert_eq!(record.amount_raised, Amount::Known(12345.0));
        assert_eq!(record.goal, Amount::Known(20000.0));
        assert!(record.description.starts_with("Our town library burned"));
        assert!(record.description.contains("Every dollar helps."));
    }

    #[test]
    fn test_extract_donations_in_page_order() {
        let record = extract("https://example.com/f/library", FULL_PAGE).unwrap();
        assert_eq!(record.donations.len(), 2);
        assert_eq!(record.donations[0].donor_name, "Jane Doe");
        assert_eq!(record.donations[0].amount, Amount::Known(50.0));
        assert_eq!(record.donations[0].when, "2 d");
        assert_eq!(record.donations[1].donor_name, "Anonymous");
    }

    #[test]
    fn test_extract_caps_donation_count() {
        let mut page = String::from("<html><body>");
        for i in 0..25 {
            page.push_str(&format!(
                r#"<div class="hrt-avatar-lockup-content"><div>Donor {i}</div>
                   <div><span class="hrt-font-bold">$1</span></div></div>"#
            ));
        }
        page.push_str("</body></html>");

        let record = extract("https://example.com/f/x", &page).unwrap();
        assert_eq!(record.donations.len(), MAX_DONATIONS);
        assert_eq!(record.donations[0].donor_name, "Donor 0");
        assert_eq!(record.donations[9].donor_name, "Donor 9");
    }

    #[test]
    fn test_missing_fields_are_unknown_not_zero() {
        let record = extract("https://example.com/f/x", "<html><body><p>hi</p></body></html>")
            .unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.description, "");
        assert_eq!(record.amount_raised, Amount::Unknown);
        assert_eq!(record.goal, Amount::Unknown);
        assert!(record.donations.is_empty());
        assert_ne!(record.amount_raised, Amount::Known(0.0));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        assert!(matches!(
            extract("https://example.com/f/x", "   \n  "),
            Err(ExtractError::EmptyDocument)
        ));
    }

    #[test]
    fn test_combined_progress_text_fallback() {
        let page = r#"<html><body>
<div class="progress-meter_progressMeterHeading__A6Slt">$12,345 raised of $20,000 goal</div>
</body></html>"#;
        let record = extract("https://example.com/f/x", page).unwrap();
        assert_eq!(record.amount_raised, Amount::Known(12345.0));
        assert_eq!(record.goal, Amount::Known(20000.0));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$12,345"), Amount::Known(12345.0));
        assert_eq!(parse_amount("€1,234.56"), Amount::Known(1234.56));
        assert_eq!(parse_amount("20,000"), Amount::Known(20000.0));
        assert_eq!(parse_amount("$15K goal"), Amount::Known(15000.0));
        assert_eq!(parse_amount("1.2M"), Amount::Known(1_200_000.0));
    }

    #[test]
    fn test_parse_amount_failures_are_unknown() {
        assert_eq!(parse_amount("N/A"), Amount::Unknown);
        assert_eq!(parse_amount(""), Amount::Unknown);
        assert_eq!(parse_amount("goal"), Amount::Unknown);
    }

    #[test]
    fn test_unparseable_goal_leaves_raised_intact() {
        let page = r#"<html><body>
<div class="progress-meter_progressMeterHeading__A6Slt">
  <div class="progress-meter_largeType__L_4O8">$500</div>
  <span class="hrt-text-body-sm hrt-text-gray">no target set</span>
</div>
</body></html>"#;
        let record = extract("https://example.com/f/x", page).unwrap();
        assert_eq!(record.amount_raised, Amount::Known(500.0));
        assert_eq!(record.goal, Amount::Unknown);
    }
}
