//! Same-origin / cross-origin classification of resolved addresses

use url::Url;

/// Classifies addresses relative to the page the engine runs in
#[derive(Debug, Clone, Default)]
pub struct OriginClassifier {
    page: Option<Url>,
}

impl OriginClassifier {
    /// Create a classifier for the given page location
    pub fn new(page: Option<Url>) -> Self {
        Self { page }
    }

    /// Page location, if known
    pub fn page(&self) -> Option<&Url> {
        self.page.as_ref()
    }

    /// Returns true only when `address` provably belongs to another origin.
    ///
    /// Relative addresses are resolved against the page. Anything that cannot
    /// be parsed (or an unknown page) counts as same-origin so routing is
    /// still attempted.
    pub fn is_cross_origin(&self, address: &str) -> bool {
        let target = match &self.page {
            Some(page) => page.join(address),
            None => Url::parse(address),
        };
        let Ok(target) = target else {
            return false;
        };
        let Some(page) = &self.page else {
            return false;
        };

        // Serialized comparison: opaque origins all serialize to "null"
        target.origin().ascii_serialization() != page.origin().ascii_serialization()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> OriginClassifier {
        OriginClassifier::new(Url::parse("https://play.example.com/table/42").ok())
    }

    #[test]
    fn test_relative_is_same_origin() {
        let c = classifier();
        assert!(!c.is_cross_origin("./sounds/deal.ogg"));
        assert!(!c.is_cross_origin("/static/deal.ogg"));
    }

    #[test]
    fn test_other_host_is_cross_origin() {
        let c = classifier();
        assert!(c.is_cross_origin("https://cdn.example.com/deal.ogg"));
        assert!(c.is_cross_origin("http://play.example.com/deal.ogg"));
        assert!(c.is_cross_origin("https://play.example.com:8443/deal.ogg"));
    }

    #[test]
    fn test_same_host_absolute() {
        assert!(!classifier().is_cross_origin("https://play.example.com/a.ogg"));
    }

    #[test]
    fn test_unparseable_is_same_origin() {
        assert!(!classifier().is_cross_origin("http://[::1"));
        assert!(!OriginClassifier::default().is_cross_origin("https://cdn.example.com/a.ogg"));
    }
}
