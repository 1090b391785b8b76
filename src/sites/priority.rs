//! Priority classification of sites

use super::types::Site;

/// Decides which sites are dispatched first under time pressure
pub trait PriorityClassifier: Send + Sync {
    fn is_priority(&self, site: &Site) -> bool;

    /// Stable partition into (priority, normal), preserving input order
    fn classify(&self, sites: Vec<Site>) -> (Vec<Site>, Vec<Site>) {
        sites.into_iter().partition(|s| self.is_priority(s))
    }
}

/// Allow-list classifier: a site is priority if its name contains any marker
#[derive(Debug, Clone, Default)]
pub struct MarkerClassifier {
    markers: Vec<String>,
}

impl MarkerClassifier {
    pub fn new(markers: Vec<String>) -> Self {
        let markers = markers.into_iter().filter(|m| !m.is_empty()).collect();
        Self { markers }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl PriorityClassifier for MarkerClassifier {
    fn is_priority(&self, site: &Site) -> bool {
        self.markers.iter().any(|m| site.name.contains(m.as_str()))
    }
}

impl<F> PriorityClassifier for F
where
    F: Fn(&Site) -> bool + Send + Sync,
{
    fn is_priority(&self, site: &Site) -> bool {
        self(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str) -> Site {
        Site::new(name.to_lowercase(), name, "https://example.com")
    }

    #[test]
    fn test_marker_partition_is_stable() {
        let classifier = MarkerClassifier::new(vec!["Archive".into(), "Wiki".into()]);
        let sites = vec![
            site("Alpha"),
            site("Film Archive"),
            site("Beta"),
            site("FanWiki"),
            site("Gamma Archive"),
        ];

        let (priority, normal) = classifier.classify(sites);
        let p: Vec<_> = priority.iter().map(|s| s.name.as_str()).collect();
        let n: Vec<_> = normal.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(p, vec!["Film Archive", "FanWiki", "Gamma Archive"]);
        assert_eq!(n, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let classifier = MarkerClassifier::new(vec!["Archive".into()]);
        assert!(!classifier.is_priority(&site("archive of things")));
    }

    #[test]
    fn test_empty_markers_ignored() {
        let classifier = MarkerClassifier::new(vec![String::new()]);
        assert!(classifier.markers().is_empty());
        assert!(!classifier.is_priority(&site("Anything")));
    }

    #[test]
    fn test_closure_classifier() {
        let classifier = |s: &Site| s.id.starts_with('p');
        let (priority, normal) = classifier.classify(vec![site("Pone"), site("Two")]);
        assert_eq!(priority.len(), 1);
        assert_eq!(normal.len(), 1);
    }
}
