use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::models::config_document::ConfigDocument;

/// Name of the placeholder bound to the document's `project_id`.
pub const PROJECT_ID_PARAM: &str = "project_id";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is valid")
});

/// Named substitution values for `{name}` placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combined set for a document: `[param]` plus a synthesized
    /// `project_id` entry bound to `ConfigDocument::project`.
    pub fn from_document(doc: &ConfigDocument) -> Self {
        let mut params = doc.parameters.clone();
        if let Some(project) = doc.project() {
            params.insert(PROJECT_ID_PARAM.to_string(), project.to_string());
        }
        Self(params)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Substitutes `{name}` placeholders in config templates.
///
/// Pure and single-pass: substituted values are never scanned again, and
/// placeholders without a binding are left verbatim.
pub struct PlaceholderResolver;

impl PlaceholderResolver {
    /// Replace every `{name}` whose `name` is bound in `params`.
    pub fn resolve(template: &str, params: &Parameters) -> String {
        if params.is_empty() || !template.contains('{') {
            return template.to_string();
        }
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Resolve every value of a template map, keeping the keys.
    pub fn resolve_all(
        templates: &BTreeMap<String, String>,
        params: &Parameters,
    ) -> BTreeMap<String, String> {
        templates
            .iter()
            .map(|(k, v)| (k.clone(), Self::resolve(v, params)))
            .collect()
    }

    /// Placeholder names in order of appearance (duplicates kept once).
    pub fn placeholders(template: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(template) {
            let name = &caps[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Placeholder names in `template` with no binding in `params`.
    pub fn unresolved(template: &str, params: &Parameters) -> Vec<String> {
        Self::placeholders(template)
            .into_iter()
            .filter(|name| params.get(name).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        pairs.iter().copied().collect()
    }

    #[test]
    fn replaces_every_occurrence() {
        let p = params(&[("project_id", "proj1")]);
        assert_eq!(
            PlaceholderResolver::resolve("{project_id}-db/{project_id}", &p),
            "proj1-db/proj1"
        );
    }

    #[test]
    fn leaves_unknown_placeholders() {
        let p = params(&[("a", "1")]);
        assert_eq!(PlaceholderResolver::resolve("{a}-{b}", &p), "1-{b}");
    }

    #[test]
    fn empty_params_return_template_unchanged() {
        let template = "{x} and {y} and }{ and {";
        assert_eq!(
            PlaceholderResolver::resolve(template, &Parameters::new()),
            template
        );
    }

    #[test]
    fn resolving_twice_is_stable() {
        let p = params(&[("region", "asia"), ("env", "prod")]);
        let once = PlaceholderResolver::resolve("{env}-{region}-{other}", &p);
        let twice = PlaceholderResolver::resolve(&once, &p);
        assert_eq!(once, "prod-asia-{other}");
        assert_eq!(once, twice);
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let p = params(&[("a", "{b}"), ("b", "2")]);
        assert_eq!(PlaceholderResolver::resolve("{a}", &p), "{b}");
    }

    #[test]
    fn malformed_braces_are_literal() {
        let p = params(&[("a", "1")]);
        assert_eq!(PlaceholderResolver::resolve("{a", &p), "{a");
        assert_eq!(PlaceholderResolver::resolve("{}", &p), "{}");
        assert_eq!(PlaceholderResolver::resolve("{{a}}", &p), "{1}");
    }

    #[test]
    fn from_document_adds_project_id() {
        let doc = ConfigDocument {
            project_id: "proj1".into(),
            parameters: [("project_id".to_string(), "shadowed".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let p = Parameters::from_document(&doc);

        assert_eq!(p.get(PROJECT_ID_PARAM), Some("proj1"));
        assert_eq!(
            PlaceholderResolver::resolve("{project_id}-db", &p),
            "proj1-db"
        );
    }

    #[test]
    fn from_document_without_project_keeps_param() {
        let doc = ConfigDocument {
            parameters: [("project_id".to_string(), "from-param".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let p = Parameters::from_document(&doc);
        assert_eq!(p.get(PROJECT_ID_PARAM), Some("from-param"));
    }

    #[test]
    fn names_with_spaces_punctuation_and_unicode_are_replaced() {
        let p = params(&[("db host", "h1"), ("region:zone", "z"), ("ünï", "u")]);
        assert_eq!(
            PlaceholderResolver::resolve("{db host}/{region:zone}/{ünï}", &p),
            "h1/z/u"
        );
        assert_eq!(
            PlaceholderResolver::unresolved("{db host}/{other key}", &p),
            vec!["other key"]
        );
    }

    #[test]
    fn lists_placeholders_once() {
        assert_eq!(
            PlaceholderResolver::placeholders("{a}/{b}/{a}"),
            vec!["a", "b"]
        );
        let p = params(&[("a", "1")]);
        assert_eq!(PlaceholderResolver::unresolved("{a}/{b}", &p), vec!["b"]);
    }
}
