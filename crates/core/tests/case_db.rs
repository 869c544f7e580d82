use triage_core::db::{
    BundleRecord, CaseDb, DbError, ModuleRunRecord, ModuleRunStatus, CURRENT_SCHEMA_VERSION,
};
use triage_core::model::Detection;

fn open_temp_db(dir: &tempfile::TempDir) -> CaseDb {
    CaseDb::open(&dir.path().join("case.db")).unwrap()
}

#[test]
fn open_applies_migrations_to_latest_version() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_temp_db(&dir);
    let version: i32 =
        db.connection().query_row("PRAGMA user_version;", [], |row| row.get(0)).unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn reopening_an_existing_db_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("case.db");
    drop(CaseDb::open(&path).unwrap());
    let db = CaseDb::open(&path).unwrap();
    assert!(db.list_bundles().unwrap().is_empty());
}

#[test]
fn newer_schema_versions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("case.db");
    {
        let db = CaseDb::open(&path).unwrap();
        db.connection().execute_batch("PRAGMA user_version = 99;").unwrap();
    }
    match CaseDb::open(&path) {
        Err(DbError::UnsupportedSchemaVersion { found, .. }) => assert_eq!(found, 99),
        other => panic!("expected UnsupportedSchemaVersion, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn bundles_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_temp_db(&dir);

    let record = BundleRecord::new("acq-001", "bundles/acq-001", "2024-05-01T10:00:00+00:00")
        .with_artifact_hash(Some("abc123".into()));
    db.insert_bundle(&record).unwrap();

    let listed = db.list_bundles().unwrap();
    assert_eq!(listed, vec![record.clone()]);

    let found = db.find_bundle("acq-001").unwrap().expect("bundle by name");
    assert_eq!(found, record);
    assert!(db.find_bundle("acq-404").unwrap().is_none());
}

#[test]
fn module_runs_round_trip_and_filter_by_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_temp_db(&dir);

    let run_a = ModuleRunRecord {
        bundle: "acq-001".into(),
        module: "dumpsys-receivers".into(),
        status: ModuleRunStatus::Succeeded,
        actions: 4,
        detections: 0,
        ioc_source: None,
        started_at: "now".into(),
        finished_at: "now".into(),
    };
    let run_b = ModuleRunRecord {
        bundle: "acq-002".into(),
        module: "dumpsys-receivers".into(),
        status: ModuleRunStatus::Failed,
        actions: 0,
        detections: 0,
        ioc_source: Some("campaign.json".into()),
        started_at: "now".into(),
        finished_at: "now".into(),
    };
    db.insert_module_run(&run_a).unwrap();
    db.insert_module_run(&run_b).unwrap();

    let all = db.list_module_runs(None).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], run_a);
    assert_eq!(all[1], run_b);

    let filtered = db.list_module_runs(Some("acq-002")).unwrap();
    assert_eq!(filtered, vec![run_b]);
}

#[test]
fn detections_are_persisted_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_temp_db(&dir);

    let run = ModuleRunRecord {
        bundle: "acq-001".into(),
        module: "dumpsys-receivers".into(),
        status: ModuleRunStatus::Succeeded,
        actions: 2,
        detections: 1,
        ioc_source: Some("campaign.json".into()),
        started_at: "now".into(),
        finished_at: "now".into(),
    };
    let run_id = db.insert_module_run(&run).unwrap();

    // Build a detection the way the matcher does.
    let results = {
        let mut results = triage_core::model::ResultSet::new();
        let record = results.entry("android.provider.Telephony.SMS_RECEIVED").unwrap();
        record.push_receiver("com.malicious.implant/.SmsInterceptor");
        results
    };
    let detections: Vec<Detection> = triage_core::indicators::match_indicators(
        &results,
        &triage_core::indicators::IndicatorSet::from_identifiers([
            "com.malicious.implant/.SmsInterceptor",
        ]),
    );
    db.insert_run_detections(run_id, &detections).unwrap();

    let stored = db.list_run_detections(run_id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].action, "android.provider.Telephony.SMS_RECEIVED");
    assert_eq!(stored[0].receiver, "com.malicious.implant/.SmsInterceptor");
    assert_eq!(stored[0].indicator, "com.malicious.implant/.SmsInterceptor");

    assert_eq!(db.latest_run_id("acq-001", "dumpsys-receivers").unwrap(), Some(run_id));
    assert_eq!(db.latest_run_id("acq-001", "other-module").unwrap(), None);
}
