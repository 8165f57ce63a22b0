use std::fmt;

/// Outcome of checking one district site against its robots.txt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteVerdict {
    /// The site and its staff/faculty pages may be crawled
    Allowed,

    /// `Disallow: /` for every agent; the site is not crawled at all
    Denied,

    /// The site is open but staff or faculty paths are disallowed
    SensitiveDisallowed,
}

impl SiteVerdict {
    /// Returns true if the site's link goes into the accepted list
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Log label matching the checker's output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "ALLOWED",
            Self::Denied => "DENIED",
            Self::SensitiveDisallowed => "DISALLOWED",
        }
    }
}

impl fmt::Display for SiteVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_allowed_is_accepted() {
        assert!(SiteVerdict::Allowed.is_accepted());
        assert!(!SiteVerdict::Denied.is_accepted());
        assert!(!SiteVerdict::SensitiveDisallowed.is_accepted());
    }

    #[test]
    fn test_labels() {
        assert_eq!(SiteVerdict::Denied.to_string(), "DENIED");
        assert_eq!(SiteVerdict::SensitiveDisallowed.to_string(), "DISALLOWED");
    }
}
