//! Address Bar Features
//!
//! Signals computed from the URL string alone. No network access.

use once_cell::sync::Lazy;
use regex::Regex;
use url::{Host, Url};

use super::layout::{SIGNAL_LEGITIMATE, SIGNAL_PHISHING, SIGNAL_SUSPICIOUS};
use super::vector::{FeatureExtractor, FeatureVector};

/// URL length below which the address is considered normal
pub const SHORT_URL_MAX: usize = 54;

/// URL length above which the address is considered phishing
pub const LONG_URL_MIN: usize = 76;

static SHORTENER_HOSTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(www\.)?(bit\.ly|goo\.gl|shorte\.st|go2l\.ink|x\.co|ow\.ly|t\.co|tinyurl\.com|tr\.im|is\.gd|cli\.gs|yfrog\.com|migre\.me|ff\.im|tiny\.cc|url4\.eu|twit\.ac|su\.pr|twurl\.nl|snipurl\.com|short\.to|budurl\.com|ping\.fm|post\.ly|just\.as|bkite\.com|snipr\.com|fic\.kr|loopt\.us|doiop\.com|short\.ie|kl\.am|wp\.me|rubyurl\.com|om\.ly|to\.ly|bit\.do|lnkd\.in|db\.tt|qr\.ae|adf\.ly|bitly\.com|cur\.lv|ity\.im|q\.gs|po\.st|bc\.vc|twitthis\.com|u\.to|j\.mp|buzurl\.com|cutt\.us|u\.bb|yourls\.org|prettylinkpro\.com|scrnch\.me|filoops\.info|vzturl\.com|qr\.net|1url\.com|tweez\.me|v\.gd|link\.zip\.net|rb\.gy|cutt\.ly|shorturl\.at)$",
    )
    .expect("shortener pattern is valid")
});

static REPORTED_HOSTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(^|\.)(at\.ua|usa\.cc|baltazarpresentes\.com\.br|pe\.hu|esy\.es|hol\.es|sweddy\.com|myjino\.ru|96\.lt|ow\.ly)$",
    )
    .expect("reported host pattern is valid")
});

static REPORTED_IPS: &[&str] = &[
    "146.112.61.108", "213.174.157.151", "121.50.168.88", "192.185.217.116",
    "78.46.211.158", "181.174.165.13", "46.242.145.103", "121.50.168.40",
    "83.125.22.219", "46.242.145.98", "107.151.148.44", "107.151.148.107",
    "64.70.19.203", "199.184.144.27", "107.151.148.108", "107.151.148.109",
    "119.28.52.61", "54.83.43.69", "52.69.166.231", "216.58.192.225",
    "118.184.25.86", "67.208.74.71", "23.253.126.58", "104.239.157.210",
    "175.126.123.219", "141.8.224.221", "10.10.10.10", "43.229.108.32",
    "103.232.215.140", "69.172.201.153", "216.218.185.162", "54.225.104.146",
    "103.243.24.98", "199.59.243.120", "31.170.160.61", "213.19.128.77",
    "62.113.226.131", "208.100.26.234", "195.16.127.102", "195.16.127.157",
    "34.196.13.28", "103.224.212.222", "172.217.4.225", "54.72.9.51",
    "192.64.147.141", "198.200.56.183", "23.253.164.103", "52.48.191.26",
    "52.214.197.72", "87.98.255.18", "209.99.17.27", "216.38.62.18",
    "104.130.124.96", "47.89.58.141", "54.86.225.156",
    "54.82.156.19", "37.157.192.102", "204.11.56.48", "110.34.231.42",
];

/// Address bar signals for one parsed URL
pub struct LexicalFeatures<'a> {
    raw: &'a str,
    url: &'a Url,
}

impl<'a> LexicalFeatures<'a> {
    /// `raw` is the URL as submitted, `url` its parsed form
    pub fn new(raw: &'a str, url: &'a Url) -> Self {
        Self { raw, url }
    }

    fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn using_ip(&self) -> f32 {
        match self.url.host() {
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => SIGNAL_PHISHING,
            _ => SIGNAL_LEGITIMATE,
        }
    }

    pub fn long_url(&self) -> f32 {
        match self.raw.len() {
            n if n < SHORT_URL_MAX => SIGNAL_LEGITIMATE,
            n if n < LONG_URL_MIN => SIGNAL_SUSPICIOUS,
            _ => SIGNAL_PHISHING,
        }
    }

    pub fn short_url(&self) -> f32 {
        if SHORTENER_HOSTS.is_match(self.host()) {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    pub fn at_symbol(&self) -> f32 {
        if self.raw.contains('@') {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    /// `//` past position 6 means a second scheme separator inside the path
    pub fn redirecting(&self) -> f32 {
        match self.raw.rfind("//") {
            Some(pos) if pos > 6 => SIGNAL_PHISHING,
            _ => SIGNAL_LEGITIMATE,
        }
    }

    pub fn prefix_suffix(&self) -> f32 {
        if self.host().contains('-') {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    pub fn sub_domains(&self) -> f32 {
        if self.using_ip() == SIGNAL_PHISHING {
            return SIGNAL_PHISHING;
        }
        let host = self.host();
        let host = host.strip_prefix("www.").unwrap_or(host);
        match host.matches('.').count() {
            0 | 1 => SIGNAL_LEGITIMATE,
            2 => SIGNAL_SUSPICIOUS,
            _ => SIGNAL_PHISHING,
        }
    }

    pub fn https(&self) -> f32 {
        if self.url.scheme() == "https" {
            SIGNAL_LEGITIMATE
        } else {
            SIGNAL_PHISHING
        }
    }

    /// `Url::port` is `None` when the port is the scheme default
    pub fn non_std_port(&self) -> f32 {
        if self.url.port().is_some() {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    pub fn https_in_domain(&self) -> f32 {
        if self.host().to_ascii_lowercase().contains("https") {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    /// Embedded credentials or punycode labels hide the real host
    pub fn abnormal_url(&self) -> f32 {
        let has_credentials = !self.url.username().is_empty() || self.url.password().is_some();
        let punycode = self.host().split('.').any(|label| label.starts_with("xn--"));
        if has_credentials || punycode || self.host().is_empty() {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }

    pub fn stats_report(&self) -> f32 {
        let host = self.host();
        let reported = REPORTED_HOSTS.is_match(host) || REPORTED_IPS.contains(&host);
        if reported {
            SIGNAL_PHISHING
        } else {
            SIGNAL_LEGITIMATE
        }
    }
}

impl FeatureExtractor for LexicalFeatures<'_> {
    fn extract(&self, vector: &mut FeatureVector) {
        vector.set_by_name("UsingIP", self.using_ip());
        vector.set_by_name("LongURL", self.long_url());
        vector.set_by_name("ShortURL", self.short_url());
        vector.set_by_name("Symbol@", self.at_symbol());
        vector.set_by_name("Redirecting//", self.redirecting());
        vector.set_by_name("PrefixSuffix-", self.prefix_suffix());
        vector.set_by_name("SubDomains", self.sub_domains());
        vector.set_by_name("HTTPS", self.https());
        vector.set_by_name("NonStdPort", self.non_std_port());
        vector.set_by_name("HTTPSDomainURL", self.https_in_domain());
        vector.set_by_name("AbnormalURL", self.abnormal_url());
        vector.set_by_name("StatsReport", self.stats_report());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(raw: &str) -> (String, Url) {
        (raw.to_string(), Url::parse(raw).unwrap())
    }

    #[test]
    fn test_ip_host() {
        let (raw, url) = features("http://192.168.10.4/login");
        assert_eq!(LexicalFeatures::new(&raw, &url).using_ip(), SIGNAL_PHISHING);

        let (raw, url) = features("http://[::1]/");
        assert_eq!(LexicalFeatures::new(&raw, &url).using_ip(), SIGNAL_PHISHING);

        let (raw, url) = features("https://example.com");
        assert_eq!(LexicalFeatures::new(&raw, &url).using_ip(), SIGNAL_LEGITIMATE);
    }

    #[test]
    fn test_length_bands() {
        let short = format!("https://example.com/{}", "a".repeat(10));
        let medium = format!("https://example.com/{}", "a".repeat(40));
        let long = format!("https://example.com/{}", "a".repeat(80));

        for (raw, expected) in [(short, 1.0), (medium, 0.0), (long, -1.0)] {
            let url = Url::parse(&raw).unwrap();
            assert_eq!(LexicalFeatures::new(&raw, &url).long_url(), expected, "{}", raw);
        }
    }

    #[test]
    fn test_shortener_and_symbols() {
        let (raw, url) = features("https://bit.ly/3abc");
        let f = LexicalFeatures::new(&raw, &url);
        assert_eq!(f.short_url(), SIGNAL_PHISHING);

        let (raw, url) = features("http://paypal.com@evil.example/");
        let f = LexicalFeatures::new(&raw, &url);
        assert_eq!(f.at_symbol(), SIGNAL_PHISHING);
        assert_eq!(f.abnormal_url(), SIGNAL_PHISHING);

        let (raw, url) = features("http://example.com//http://evil.example");
        assert_eq!(LexicalFeatures::new(&raw, &url).redirecting(), SIGNAL_PHISHING);

        let (raw, url) = features("https://example.com/path");
        assert_eq!(LexicalFeatures::new(&raw, &url).redirecting(), SIGNAL_LEGITIMATE);
    }

    #[test]
    fn test_domain_shape() {
        let (raw, url) = features("https://secure-login.example.com");
        let f = LexicalFeatures::new(&raw, &url);
        assert_eq!(f.prefix_suffix(), SIGNAL_PHISHING);
        assert_eq!(f.sub_domains(), SIGNAL_SUSPICIOUS);

        let (raw, url) = features("https://www.example.com");
        assert_eq!(LexicalFeatures::new(&raw, &url).sub_domains(), SIGNAL_LEGITIMATE);

        let (raw, url) = features("https://a.b.c.example.com");
        assert_eq!(LexicalFeatures::new(&raw, &url).sub_domains(), SIGNAL_PHISHING);

        let (raw, url) = features("http://https-paypal.example");
        let f = LexicalFeatures::new(&raw, &url);
        assert_eq!(f.https(), SIGNAL_PHISHING);
        assert_eq!(f.https_in_domain(), SIGNAL_PHISHING);
    }

    #[test]
    fn test_ports() {
        let (raw, url) = features("http://example.com:80/");
        assert_eq!(LexicalFeatures::new(&raw, &url).non_std_port(), SIGNAL_LEGITIMATE);

        let (raw, url) = features("http://example.com:8081/");
        assert_eq!(LexicalFeatures::new(&raw, &url).non_std_port(), SIGNAL_PHISHING);
    }

    #[test]
    fn test_reported_hosts() {
        let (raw, url) = features("http://login.myjino.ru/");
        assert_eq!(LexicalFeatures::new(&raw, &url).stats_report(), SIGNAL_PHISHING);

        let (raw, url) = features("http://146.112.61.108/");
        assert_eq!(LexicalFeatures::new(&raw, &url).stats_report(), SIGNAL_PHISHING);

        let (raw, url) = features("https://example.com");
        assert_eq!(LexicalFeatures::new(&raw, &url).stats_report(), SIGNAL_LEGITIMATE);
    }

    #[test]
    fn test_extract_sets_address_bar_features() {
        let (raw, url) = features("https://example.com");
        let mut vector = FeatureVector::new();
        LexicalFeatures::new(&raw, &url).extract(&mut vector);

        assert_eq!(vector.get_by_name("HTTPS"), Some(SIGNAL_LEGITIMATE));
        assert_eq!(vector.get_by_name("UsingIP"), Some(SIGNAL_LEGITIMATE));
        // page features are untouched
        assert_eq!(vector.get_by_name("Favicon"), Some(SIGNAL_SUSPICIOUS));
    }
}
