//! Page Content Features
//!
//! Signals computed from a fetched HTML page. Markup is scanned with
//! regular expressions; malformed HTML degrades to fewer matches, never
//! to an error.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::layout::{SIGNAL_LEGITIMATE, SIGNAL_PHISHING, SIGNAL_SUSPICIOUS};
use super::vector::{FeatureExtractor, FeatureVector};

/// Feature names filled by this module
pub const PAGE_FEATURES: &[&str] = &[
    "Favicon",
    "RequestURL",
    "AnchorURL",
    "LinksInScriptTags",
    "ServerFormHandler",
    "InfoEmail",
    "WebsiteForwarding",
    "StatusBarCust",
    "DisableRightClick",
    "UsingPopupWindow",
    "IframeRedirection",
    "LinksPointingToPage",
];

// ============================================================================
// PATTERNS
// ============================================================================

fn tag_pattern(tags: &str) -> Regex {
    Regex::new(&format!(r"(?is)<(?:{tags})\b[^>]*>")).expect("tag pattern is valid")
}

fn attr_pattern(attr: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)\s{attr}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
    ))
    .expect("attribute pattern is valid")
}

static RESOURCE_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("img|audio|embed|iframe|source|video"));
static ANCHOR_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("a"));
static LINK_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("link"));
static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("script"));
static FORM_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("form"));
static IFRAME_TAG: Lazy<Regex> = Lazy::new(|| tag_pattern("iframe"));

static SRC_ATTR: Lazy<Regex> = Lazy::new(|| attr_pattern("src"));
static HREF_ATTR: Lazy<Regex> = Lazy::new(|| attr_pattern("href"));
static REL_ATTR: Lazy<Regex> = Lazy::new(|| attr_pattern("rel"));
static ACTION_ATTR: Lazy<Regex> = Lazy::new(|| attr_pattern("action"));

static MAIL_SUBMIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)mailto:|\bmail\s*\(").expect("mail pattern is valid"));
static STATUS_BAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)onmouseover\s*=\s*["'][^"']*window\.status"#).expect("status bar pattern is valid")
});
static RIGHT_CLICK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)event\.button\s*===?\s*2|oncontextmenu\s*=\s*["']?\s*return\s+false"#)
        .expect("right click pattern is valid")
});
static POPUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)window\.open\s*\(|\bprompt\s*\(").expect("popup pattern is valid")
});
static HIDDEN_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)frameborder\s*=\s*["']?0|display\s*:\s*none|visibility\s*:\s*hidden|\swidth\s*=\s*["']?0["'\s>]"#,
    )
    .expect("hidden frame pattern is valid")
});

// ============================================================================
// PAGE SNAPSHOT
// ============================================================================

/// A fetched page: where the fetch ended and what it returned
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub final_url: Url,
    pub body: String,
    pub redirects: usize,
}

impl PageSnapshot {
    pub fn new(final_url: Url, body: impl Into<String>, redirects: usize) -> Self {
        Self {
            final_url,
            body: body.into(),
            redirects,
        }
    }
}

fn attr_value<'a>(pattern: &Regex, tag: &'a str) -> Option<&'a str> {
    let caps = pattern.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim())
}

fn tag_attr_values<'a>(tags: &Regex, attr: &Regex, body: &'a str) -> Vec<&'a str> {
    tags.find_iter(body)
        .filter_map(|tag| attr_value(attr, tag.as_str()))
        .collect()
}

/// Registrable part of a host: last two labels, three under short ccTLD
/// second levels such as `co.uk` or `com.br`. IP hosts are kept whole.
fn site_of(host: &str) -> String {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    if host.starts_with('[') || host.parse::<std::net::Ipv4Addr>().is_ok() {
        return host;
    }
    let labels: Vec<&str> = host.split('.').collect();
    let n = labels.len();
    let keep = if n > 2 && labels[n - 1].len() == 2 && labels[n - 2].len() <= 3 {
        3
    } else {
        2
    };
    labels[n.saturating_sub(keep)..].join(".")
}

fn same_site(a: &str, b: &str) -> bool {
    site_of(a) == site_of(b)
}

/// Percentage bands shared by the ratio features
fn ratio_band(flagged: usize, total: usize, low: f32, high: f32) -> f32 {
    if total == 0 {
        return SIGNAL_LEGITIMATE;
    }
    let percent = flagged as f32 / total as f32 * 100.0;
    if percent < low {
        SIGNAL_LEGITIMATE
    } else if percent < high {
        SIGNAL_SUSPICIOUS
    } else {
        SIGNAL_PHISHING
    }
}

// ============================================================================
// PAGE FEATURES
// ============================================================================

/// Page signals for a URL. `page` is `None` when the fetch failed or was skipped.
pub struct PageFeatures<'a> {
    url: &'a Url,
    page: Option<&'a PageSnapshot>,
}

impl<'a> PageFeatures<'a> {
    pub fn new(url: &'a Url, page: Option<&'a PageSnapshot>) -> Self {
        Self { url, page }
    }

    /// A reference is external when it resolves to a host unrelated to
    /// both the submitted URL and the page it landed on
    fn is_external(&self, page: &PageSnapshot, reference: &str) -> bool {
        let Ok(target) = page.final_url.join(reference) else {
            return false;
        };
        let Some(host) = target.host_str() else {
            return false;
        };
        let origins = [self.url.host_str(), page.final_url.host_str()];
        !origins.iter().flatten().any(|origin| same_site(host, origin))
    }

    fn favicon(&self, page: &PageSnapshot) -> f32 {
        let external = LINK_TAG
            .find_iter(&page.body)
            .map(|tag| tag.as_str())
            .filter(|tag| {
                attr_value(&REL_ATTR, tag)
                    .map(|rel| rel.to_ascii_lowercase().contains("icon"))
                    .unwrap_or(false)
            })
            .filter_map(|tag| attr_value(&HREF_ATTR, tag))
            .any(|href| self.is_external(page, href));
        if external {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    fn request_url(&self, page: &PageSnapshot) -> f32 {
        let sources = tag_attr_values(&RESOURCE_TAG, &SRC_ATTR, &page.body);
        let external = sources.iter().filter(|src| self.is_external(page, src)).count();
        ratio_band(external, sources.len(), 22.0, 61.0)
    }

    fn anchor_url(&self, page: &PageSnapshot) -> f32 {
        let anchors = tag_attr_values(&ANCHOR_TAG, &HREF_ATTR, &page.body);
        let unsafe_count = anchors
            .iter()
            .filter(|href| {
                let lower = href.to_ascii_lowercase();
                lower.is_empty()
                    || lower.starts_with('#')
                    || lower.starts_with("javascript")
                    || lower.starts_with("mailto")
                    || self.is_external(page, href)
            })
            .count();
        ratio_band(unsafe_count, anchors.len(), 31.0, 67.0)
    }

    fn links_in_script_tags(&self, page: &PageSnapshot) -> f32 {
        let mut references = tag_attr_values(&LINK_TAG, &HREF_ATTR, &page.body);
        references.extend(tag_attr_values(&SCRIPT_TAG, &SRC_ATTR, &page.body));
        let external = references.iter().filter(|r| self.is_external(page, r)).count();
        ratio_band(external, references.len(), 17.0, 81.0)
    }

    fn server_form_handler(&self, page: &PageSnapshot) -> f32 {
        let mut signal = SIGNAL_LEGITIMATE;
        for form in FORM_TAG.find_iter(&page.body) {
            let Some(action) = attr_value(&ACTION_ATTR, form.as_str()) else {
                continue;
            };
            if action.is_empty() || action.eq_ignore_ascii_case("about:blank") {
                return SIGNAL_PHISHING;
            }
            if self.is_external(page, action) {
                signal = SIGNAL_SUSPICIOUS;
            }
        }
        signal
    }

    fn info_email(&self, page: &PageSnapshot) -> f32 {
        if MAIL_SUBMIT.is_match(&page.body) {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    fn website_forwarding(&self, page: &PageSnapshot) -> f32 {
        match page.redirects {
            0..=1 => SIGNAL_LEGITIMATE,
            2..=4 => SIGNAL_SUSPICIOUS,
            _ => SIGNAL_PHISHING,
        }
    }

    fn pattern_signal(pattern: &Regex, page: &PageSnapshot) -> f32 {
        if pattern.is_match(&page.body) {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    fn iframe_redirection(&self, page: &PageSnapshot) -> f32 {
        let hidden = IFRAME_TAG
            .find_iter(&page.body)
            .any(|tag| HIDDEN_FRAME.is_match(tag.as_str()));
        if hidden {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    fn links_pointing_to_page(&self, page: &PageSnapshot) -> f32 {
        match tag_attr_values(&ANCHOR_TAG, &HREF_ATTR, &page.body).len() {
            0 => SIGNAL_LEGITIMATE,
            1..=2 => SIGNAL_SUSPICIOUS,
            _ => SIGNAL_PHISHING,
        }
    }
}

impl FeatureExtractor for PageFeatures<'_> {
    fn extract(&self, vector: &mut FeatureVector) {
        let Some(page) = self.page else {
            for name in PAGE_FEATURES {
                vector.set_by_name(name, SIGNAL_PHISHING);
            }
            return;
        };

        vector.set_by_name("Favicon", self.favicon(page));
        vector.set_by_name("RequestURL", self.request_url(page));
        vector.set_by_name("AnchorURL", self.anchor_url(page));
        vector.set_by_name("LinksInScriptTags", self.links_in_script_tags(page));
        vector.set_by_name("ServerFormHandler", self.server_form_handler(page));
        vector.set_by_name("InfoEmail", self.info_email(page));
        vector.set_by_name("WebsiteForwarding", self.website_forwarding(page));
        vector.set_by_name("StatusBarCust", Self::pattern_signal(&STATUS_BAR, page));
        vector.set_by_name("DisableRightClick", Self::pattern_signal(&RIGHT_CLICK, page));
        vector.set_by_name("UsingPopupWindow", Self::pattern_signal(&POPUP, page));
        vector.set_by_name("IframeRedirection", self.iframe_redirection(page));
        vector.set_by_name("LinksPointingToPage", self.links_pointing_to_page(page));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(body: &str) -> (Url, PageSnapshot) {
        let url = Url::parse("https://shop.example.com/login").unwrap();
        let page = PageSnapshot::new(url.clone(), body, 0);
        (url, page)
    }

    fn extract(body: &str) -> FeatureVector {
        let (url, page) = snapshot(body);
        let mut vector = FeatureVector::new();
        PageFeatures::new(&url, Some(&page)).extract(&mut vector);
        vector
    }

    #[test]
    fn test_missing_page_is_phishing() {
        let url = Url::parse("https://example.com").unwrap();
        let mut vector = FeatureVector::new();
        PageFeatures::new(&url, None).extract(&mut vector);

        for name in PAGE_FEATURES {
            assert_eq!(vector.get_by_name(name), Some(SIGNAL_PHISHING), "{}", name);
        }
        assert_eq!(vector.get_by_name("HTTPS"), Some(SIGNAL_SUSPICIOUS));
    }

    #[test]
    fn test_clean_page() {
        let vector = extract(
            r#"<html><head><link rel="icon" href="/favicon.ico">
            <script src="/app.js"></script></head>
            <body><img src="/logo.png"><a href="/about">About</a></body></html>"#,
        );
        assert_eq!(vector.get_by_name("Favicon"), Some(SIGNAL_LEGITIMATE));
        assert_eq!(vector.get_by_name("RequestURL"), Some(SIGNAL_LEGITIMATE));
        assert_eq!(vector.get_by_name("AnchorURL"), Some(SIGNAL_LEGITIMATE));
        assert_eq!(vector.get_by_name("LinksInScriptTags"), Some(SIGNAL_LEGITIMATE));
        assert_eq!(vector.get_by_name("ServerFormHandler"), Some(SIGNAL_LEGITIMATE));
        assert_eq!(vector.get_by_name("LinksPointingToPage"), Some(SIGNAL_SUSPICIOUS));
    }

    #[test]
    fn test_external_resources() {
        let vector = extract(
            r#"<link rel="shortcut icon" href="https://cdn.evil.example/fav.ico">
            <img src="https://evil.example/a.png"><img src='https://evil.example/b.png'>
            <img src=/local.png>"#,
        );
        assert_eq!(vector.get_by_name("Favicon"), Some(SIGNAL_PHISHING));
        // 2 of 3 external = 66%
        assert_eq!(vector.get_by_name("RequestURL"), Some(SIGNAL_PHISHING));
    }

    #[test]
    fn test_subdomain_resources_are_internal() {
        let vector = extract(r#"<img src="https://static.example.com/logo.png">"#);
        assert_eq!(vector.get_by_name("RequestURL"), Some(SIGNAL_LEGITIMATE));
    }

    #[test]
    fn test_unsafe_anchors() {
        let vector = extract(
            r##"<a href="#">x</a><a href="javascript:void(0)">y</a><a href="/ok">z</a>"##,
        );
        assert_eq!(vector.get_by_name("AnchorURL"), Some(SIGNAL_SUSPICIOUS));
        assert_eq!(vector.get_by_name("LinksPointingToPage"), Some(SIGNAL_PHISHING));
    }

    #[test]
    fn test_form_handlers() {
        let blank = extract(r#"<form action="about:blank"><input></form>"#);
        assert_eq!(blank.get_by_name("ServerFormHandler"), Some(SIGNAL_PHISHING));

        let external = extract(r#"<form method="post" action="https://collector.example/x"></form>"#);
        assert_eq!(external.get_by_name("ServerFormHandler"), Some(SIGNAL_SUSPICIOUS));

        let local = extract(r#"<form action="/session"></form>"#);
        assert_eq!(local.get_by_name("ServerFormHandler"), Some(SIGNAL_LEGITIMATE));
    }

    #[test]
    fn test_script_behaviour() {
        let vector = extract(
            r#"<a href="/" onmouseover="window.status='https://bank.example'">x</a>
            <script>if (event.button == 2) { alert('no'); } window.open('/win');</script>
            <iframe src="/x" width="0" height="0" frameborder="0"></iframe>
            <form action="mailto:drop@evil.example"></form>"#,
        );
        assert_eq!(vector.get_by_name("StatusBarCust"), Some(SIGNAL_PHISHING));
        assert_eq!(vector.get_by_name("DisableRightClick"), Some(SIGNAL_PHISHING));
        assert_eq!(vector.get_by_name("UsingPopupWindow"), Some(SIGNAL_PHISHING));
        assert_eq!(vector.get_by_name("IframeRedirection"), Some(SIGNAL_PHISHING));
        assert_eq!(vector.get_by_name("InfoEmail"), Some(SIGNAL_PHISHING));
    }

    #[test]
    fn test_redirect_bands() {
        let url = Url::parse("https://example.com").unwrap();
        for (redirects, expected) in [(0, 1.0), (3, 0.0), (6, -1.0)] {
            let page = PageSnapshot::new(url.clone(), "", redirects);
            let mut vector = FeatureVector::new();
            PageFeatures::new(&url, Some(&page)).extract(&mut vector);
            assert_eq!(vector.get_by_name("WebsiteForwarding"), Some(expected));
        }
    }
}
