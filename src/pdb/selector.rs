// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static LABEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap()
});

/// Extends [`LabelSelector`] with label set evaluation.
pub trait LabelSelectorExt {
    /// Returns whether `labels` satisfy every `matchLabels` entry and every
    /// `matchExpressions` requirement. An empty selector matches everything.
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool;
}

impl LabelSelectorExt for LabelSelector {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let labels_match = self.match_labels.as_ref().is_none_or(|match_labels| {
            match_labels
                .iter()
                .all(|(key, value)| labels.get(key) == Some(value))
        });

        labels_match
            && self
                .match_expressions
                .iter()
                .flatten()
                .all(|requirement| requirement_matches(requirement, labels))
    }
}

fn requirement_matches(
    requirement: &LabelSelectorRequirement,
    labels: &BTreeMap<String, String>,
) -> bool {
    let value = labels.get(&requirement.key);
    let in_values = |v: &String| {
        requirement
            .values
            .as_ref()
            .is_some_and(|values| values.contains(v))
    };

    match requirement.operator.as_str() {
        "In" => value.is_some_and(in_values),
        "NotIn" => !value.is_some_and(in_values),
        "Exists" => value.is_some(),
        "DoesNotExist" => value.is_none(),
        // the API server rejects any other operator; treat it as selecting nothing
        _ => false,
    }
}

/// Builds the `matchLabels` selector for a label set.
pub fn selector_for_labels(labels: BTreeMap<String, String>) -> LabelSelector {
    LabelSelector {
        match_labels: if labels.is_empty() { None } else { Some(labels) },
        ..Default::default()
    }
}

/// Label names accepted by the routing-label editor.
pub fn is_valid_label_name(name: &str) -> bool {
    LABEL_NAME.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::labels;
    use rstest::rstest;

    fn requirement(key: &str, operator: &str, values: &[&str]) -> LabelSelectorRequirement {
        LabelSelectorRequirement {
            key: key.to_owned(),
            operator: operator.to_owned(),
            values: if values.is_empty() {
                None
            } else {
                Some(values.iter().map(|v| v.to_string()).collect())
            },
        }
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        let selector = LabelSelector::default();
        assert!(selector.matches(&BTreeMap::new()));
        assert!(selector.matches(&labels([("app", "foo")])));
    }

    #[test]
    fn test_match_labels_require_all_pairs() {
        let selector = selector_for_labels(labels([("app", "foo"), ("tier", "db")]));
        assert!(selector.matches(&labels([("app", "foo"), ("tier", "db"), ("x", "y")])));
        assert!(!selector.matches(&labels([("app", "foo")])));
        assert!(!selector.matches(&labels([("app", "bar"), ("tier", "db")])));
    }

    #[rstest]
    #[case(requirement("env", "In", &["prod", "staging"]), &[("env", "prod")], true)]
    #[case(requirement("env", "In", &["prod"]), &[("env", "dev")], false)]
    #[case(requirement("env", "In", &["prod"]), &[], false)]
    #[case(requirement("env", "NotIn", &["prod"]), &[("env", "dev")], true)]
    #[case(requirement("env", "NotIn", &["prod"]), &[], true)]
    #[case(requirement("env", "NotIn", &["prod"]), &[("env", "prod")], false)]
    #[case(requirement("env", "Exists", &[]), &[("env", "")], true)]
    #[case(requirement("env", "Exists", &[]), &[], false)]
    #[case(requirement("env", "DoesNotExist", &[]), &[], true)]
    #[case(requirement("env", "DoesNotExist", &[]), &[("env", "x")], false)]
    #[case(requirement("env", "Gt", &["1"]), &[("env", "2")], false)]
    fn test_match_expressions(
        #[case] requirement: LabelSelectorRequirement,
        #[case] pod_labels: &[(&str, &str)],
        #[case] expected: bool,
    ) {
        let selector = LabelSelector {
            match_expressions: Some(vec![requirement]),
            ..Default::default()
        };
        assert_eq!(
            selector.matches(&labels(pod_labels.iter().copied())),
            expected
        );
    }

    #[test]
    fn test_match_labels_and_expressions_combined() {
        let selector = LabelSelector {
            match_labels: Some(labels([("app", "foo")])),
            match_expressions: Some(vec![requirement("env", "In", &["prod"])]),
        };
        assert!(selector.matches(&labels([("app", "foo"), ("env", "prod")])));
        assert!(!selector.matches(&labels([("app", "foo"), ("env", "dev")])));
    }

    #[rstest]
    #[case("app", true)]
    #[case("_private", true)]
    #[case("Label_9", true)]
    #[case("9abc", false)]
    #[case("aa&^%", false)]
    #[case("_abc_%", false)]
    #[case("", false)]
    fn test_is_valid_label_name(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_label_name(name), expected);
    }
}
