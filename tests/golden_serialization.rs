use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use cfr_tally::source::catalog::AgenciesResponse;
use cfr_tally::types::{AgencySnapshot, AggregateResult, ChildTotals, HierarchyLevel, TitleNumber};

#[test]
fn golden_agency_snapshot_serialization() {
    let mut children = BTreeMap::new();
    children.insert(
        "Bureau of Samples".to_string(),
        ChildTotals {
            slug: "bureau-of-samples".to_string(),
            words: 10,
            sections: 1,
        },
    );
    let result = AggregateResult {
        slug: "department-of-examples".to_string(),
        total_words: 13,
        total_sections: 3,
        children,
    };
    let snapshot = AgencySnapshot::new(
        "Department of Examples",
        result,
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap(),
    );

    let json_str = serde_json::to_string_pretty(&snapshot).unwrap();

    const EXPECTED_JSON: &str = r#"{
      "name": "Department of Examples",
      "slug": "department-of-examples",
      "total_words": 13,
      "total_sections": 3,
      "children": {
        "Bureau of Samples": {
          "slug": "bureau-of-samples",
          "words": 10,
          "sections": 1
        }
      },
      "snapshot_date": "2025-01-15T12:00:00Z"
    }"#;

    let strip = |s: &str| -> String {
        // Whitespace inside string values matters; only strip indentation.
        s.lines().map(str::trim).collect::<Vec<_>>().join("")
    };
    assert_eq!(strip(&json_str), strip(EXPECTED_JSON), "JSON structure mismatch against golden snapshot");

    let back: AgencySnapshot = serde_json::from_str(&json_str).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn golden_agency_listing_deserialization() {
    let body = r#"{
      "agencies": [
        {
          "name": "Department of Agriculture",
          "short_name": "USDA",
          "display_name": "Department of Agriculture",
          "sortable_name": "Agriculture, Department of",
          "slug": "agriculture-department",
          "children": [
            {
              "name": "Agricultural Marketing Service",
              "slug": "agricultural-marketing-service",
              "children": [],
              "cfr_references": [{"title": 7, "chapter": "I"}, {"title": 7, "chapter": "IX"}]
            }
          ],
          "cfr_references": [{"title": 2, "chapter": "IV"}, {"title": 7, "subtitle": "A"}]
        },
        {"name": "Bare Office", "slug": "bare-office"},
        {
          "name": "Office of Strings",
          "slug": "office-of-strings",
          "cfr_references": [{"title": "5", "part": "100"}, {"title": " 48 ", "chapter": "1"}]
        }
      ]
    }"#;

    let response: AgenciesResponse = serde_json::from_str(body).unwrap();
    assert_eq!(response.agencies.len(), 3);

    let usda = &response.agencies[0];
    assert_eq!(usda.slug, "agriculture-department");
    assert_eq!(usda.references.len(), 2);
    assert_eq!(usda.references[0].title, TitleNumber::new(2));
    assert_eq!(usda.references[0].level(HierarchyLevel::Chapter), Some("IV"));
    assert_eq!(usda.references[1].level(HierarchyLevel::Subtitle), Some("A"));
    assert_eq!(usda.references[1].level(HierarchyLevel::Chapter), None);
    assert_eq!(usda.children[0].references.len(), 2);

    let bare = &response.agencies[1];
    assert!(bare.references.is_empty());
    assert!(bare.children.is_empty());

    let strings = &response.agencies[2];
    assert_eq!(strings.references[0].title, TitleNumber::new(5));
    assert_eq!(strings.references[1].title, TitleNumber::new(48));
}

#[test]
fn golden_reference_title_is_written_as_a_number() {
    let reference: cfr_tally::types::CfrReference = serde_json::from_str(r#"{"title": "7", "part": "1"}"#).unwrap();
    assert_eq!(serde_json::to_string(&reference).unwrap(), r#"{"title":7,"part":"1"}"#);

    let err = serde_json::from_str::<cfr_tally::types::CfrReference>(r#"{"title": "VII"}"#).unwrap_err();
    assert!(err.to_string().contains("not a title number"));
}

#[test]
fn golden_reference_serialization_omits_absent_levels() {
    let reference = cfr_tally::types::CfrReference::new(TitleNumber::new(40))
        .with(HierarchyLevel::Part, "60");
    assert_eq!(serde_json::to_string(&reference).unwrap(), r#"{"title":40,"part":"60"}"#);
}
