use std::fs;

use triage_core::artifacts::{ArtifactParser, ReceiverResolverParser, Section};
use triage_core::indicators::{match_indicators, IndicatorError, IndicatorSet};

const PACKAGE_SECTION: &str = "\
Receiver Resolver Table:
  Non-Data Actions:
      android.intent.action.BOOT_COMPLETED:
        a0d2c13 com.example.app/.BootReceiver
        77f3e21 com.malicious.implant/.StartupReceiver
      android.provider.Telephony.SMS_RECEIVED:
        5d8fa02 com.malicious.implant/.SmsInterceptor
";

fn parsed() -> triage_core::model::ResultSet {
    ReceiverResolverParser::new().parse(&Section::new(PACKAGE_SECTION))
}

#[test]
fn indicator_flags_exactly_the_record_containing_it() {
    let results = parsed();
    let indicators = IndicatorSet::from_identifiers(["com.malicious.implant/.SmsInterceptor"]);

    let detections = match_indicators(&results, &indicators);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].record.action, "android.provider.Telephony.SMS_RECEIVED");
    assert_eq!(detections[0].receiver, "com.malicious.implant/.SmsInterceptor");
    assert_eq!(detections[0].matched_indicator, "com.malicious.implant/.SmsInterceptor");
}

#[test]
fn comparison_is_case_insensitive_and_reports_loaded_spelling() {
    let results = parsed();
    let indicators = IndicatorSet::from_identifiers(["COM.MALICIOUS.IMPLANT/.SMSINTERCEPTOR"]);

    let detections = match_indicators(&results, &indicators);
    assert_eq!(detections.len(), 1);
    // The matched receiver keeps the parsed spelling, the indicator its loaded one.
    assert_eq!(detections[0].receiver, "com.malicious.implant/.SmsInterceptor");
    assert_eq!(detections[0].matched_indicator, "COM.MALICIOUS.IMPLANT/.SMSINTERCEPTOR");
}

#[test]
fn record_is_flagged_at_most_once() {
    let results = parsed();
    // Both receivers of the BOOT_COMPLETED record are indicators.
    let indicators = IndicatorSet::from_identifiers([
        "com.example.app/.BootReceiver",
        "com.malicious.implant/.StartupReceiver",
    ]);

    let detections = match_indicators(&results, &indicators);
    let boot: Vec<_> = detections
        .iter()
        .filter(|d| d.record.action == "android.intent.action.BOOT_COMPLETED")
        .collect();
    assert_eq!(boot.len(), 1);
    // First match wins for reporting.
    assert_eq!(boot[0].receiver, "com.example.app/.BootReceiver");
}

#[test]
fn empty_indicator_set_flags_nothing() {
    let results = parsed();
    let detections = match_indicators(&results, &IndicatorSet::empty());
    assert!(detections.is_empty());
}

#[test]
fn every_detection_refers_to_an_existing_record() {
    let results = parsed();
    let indicators = IndicatorSet::from_identifiers([
        "com.malicious.implant/.StartupReceiver",
        "com.malicious.implant/.SmsInterceptor",
        "com.unrelated.app/.NeverRegistered",
    ]);

    let detections = match_indicators(&results, &indicators);
    assert_eq!(detections.len(), 2);
    for detection in &detections {
        assert!(results.get(&detection.record.action).is_some());
    }
}

#[test]
fn matching_does_not_mutate_results() {
    let results = parsed();
    let snapshot = results.clone();
    let indicators = IndicatorSet::from_identifiers(["com.malicious.implant/.SmsInterceptor"]);
    let _ = match_indicators(&results, &indicators);
    assert_eq!(results, snapshot);
}

#[test]
fn loads_indicators_from_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iocs.json");
    fs::write(&path, r#"["com.malicious.implant/.SmsInterceptor"]"#).unwrap();

    let indicators = IndicatorSet::load(&path).unwrap();
    assert_eq!(indicators.len(), 1);
    assert!(indicators.match_identifier("COM.MALICIOUS.IMPLANT/.smsinterceptor").is_some());
}

#[test]
fn loads_named_indicator_set_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iocs.yaml");
    fs::write(
        &path,
        "name: implant-campaign\nidentifiers:\n  - com.malicious.implant/.SmsInterceptor\n",
    )
    .unwrap();

    let indicators = IndicatorSet::load(&path).unwrap();
    assert_eq!(indicators.source(), Some("implant-campaign"));
    assert_eq!(indicators.len(), 1);
}

#[test]
fn duplicate_identifiers_keep_the_first_loaded_spelling() {
    let indicators = IndicatorSet::from_identifiers([
        "com.malicious.implant/.SmsInterceptor",
        "COM.MALICIOUS.IMPLANT/.SMSINTERCEPTOR",
    ]);
    assert_eq!(indicators.len(), 1);
    assert_eq!(
        indicators.match_identifier("com.malicious.implant/.smsinterceptor"),
        Some("com.malicious.implant/.SmsInterceptor")
    );
}

#[test]
fn unsupported_extension_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iocs.txt");
    fs::write(&path, "com.malicious.implant/.SmsInterceptor").unwrap();

    match IndicatorSet::load(&path) {
        Err(IndicatorError::UnsupportedFormat { .. }) => {}
        other => panic!("expected UnsupportedFormat, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn unreadable_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    match IndicatorSet::load(&path) {
        Err(IndicatorError::Read { .. }) => {}
        other => panic!("expected Read error, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iocs.json");
    fs::write(&path, "{not json").unwrap();

    match IndicatorSet::load(&path) {
        Err(IndicatorError::Parse { .. }) => {}
        other => panic!("expected Parse error, got {:?}", other.map(|s| s.len())),
    }
}
