//! End-to-end tests of the office over a SQLite file.

use chrono::NaiveDate;
use dental_records_core::format::{age_on, format_currency, format_phone};
use dental_records_core::{
    Database, DentalOffice, Intent, NewPatient, NewVisit, NoticeLevel, OfficeConfig,
    PatientStatus, PatientType, Snapshot, VisitChanges,
};

fn open_at(path: &std::path::Path) -> DentalOffice<Database> {
    let config = OfficeConfig::default().with_database_path(path);
    let db = config.open_database().unwrap();
    DentalOffice::open(config, db).unwrap()
}

#[test]
fn test_changes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("office.db");

    let created_id = {
        let mut office = open_at(&path);
        let mut screen = Snapshot::default();
        office
            .dispatch_visits(
                Intent::CreateRequested(NewVisit {
                    visit_date: NaiveDate::from_ymd_opt(2024, 4, 2),
                    patient_name: "Ana Lee".into(),
                    file_number: "P004".into(),
                    patient_type: PatientType::Insurance,
                    procedure: "Whitening".into(),
                    price: 400.0,
                    discount: Some(40.0),
                    notes: None,
                }),
                &mut screen,
            )
            .unwrap();
        assert_eq!(screen.notices[0].level, NoticeLevel::Success);
        office.visits().all()[3].id.clone()
    };

    let office = open_at(&path);
    assert_eq!(office.patients().len(), 3);
    assert_eq!(office.visits().len(), 4);

    let visit = office.visits().get(&created_id).unwrap();
    assert_eq!(visit.final_price, 360.0);
    assert_eq!(visit.patient_type, PatientType::Insurance);
}

#[test]
fn test_seeding_happens_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("office.db");

    let first_ids: Vec<String> = open_at(&path)
        .patients()
        .all()
        .iter()
        .map(|p| p.id.clone())
        .collect();
    let second_ids: Vec<String> = open_at(&path)
        .patients()
        .all()
        .iter()
        .map(|p| p.id.clone())
        .collect();

    assert_eq!(first_ids, second_ids);
}

#[test]
fn test_deleting_everything_reseeds_on_next_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("office.db");

    {
        let mut office = open_at(&path);
        let ids: Vec<String> = office.visits().all().iter().map(|v| v.id.clone()).collect();
        let mut screen = Snapshot::default();
        for id in ids {
            office
                .dispatch_visits(Intent::DeleteRequested(id), &mut screen)
                .unwrap();
        }
        assert!(office.visits().is_empty());
    }

    assert_eq!(open_at(&path).visits().len(), 3);
}

#[test]
fn test_new_patient_defaults_and_display() {
    let dir = tempfile::tempdir().unwrap();
    let mut office = open_at(&dir.path().join("office.db"));
    let mut screen = Snapshot::default();
    let dob = NaiveDate::from_ymd_opt(1990, 6, 1).unwrap();

    office
        .dispatch_patients(
            Intent::CreateRequested(NewPatient {
                first_name: "Ana".into(),
                last_name: "Lee".into(),
                phone: "5551234567".into(),
                date_of_birth: Some(dob),
                ..Default::default()
            }),
            &mut screen,
        )
        .unwrap();

    let ana = screen.view.iter().find(|p| p.first_name == "Ana").unwrap();
    assert_eq!(ana.status, PatientStatus::Active);
    assert_eq!(format_phone(&ana.phone), "(555) 123-4567");

    let today = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    assert_eq!(age_on(ana.date_of_birth.unwrap(), today), 33);
}

#[test]
fn test_visit_seed_values() {
    let dir = tempfile::tempdir().unwrap();
    let office = open_at(&dir.path().join("office.db"));

    let files: Vec<&str> = office
        .visits()
        .all()
        .iter()
        .map(|v| v.file_number.as_str())
        .collect();
    let finals: Vec<String> = office
        .visits()
        .all()
        .iter()
        .map(|v| format_currency(v.final_price, "$"))
        .collect();

    assert_eq!(files, vec!["P001", "P002", "P003"]);
    assert_eq!(finals, vec!["$150.00", "$1,100.00", "$250.00"]);
}

#[test]
fn test_discount_only_update_keeps_final_price() {
    let dir = tempfile::tempdir().unwrap();
    let mut office = open_at(&dir.path().join("office.db"));
    let mut screen = Snapshot::default();
    let before = office.visits().all()[1].clone();

    office
        .dispatch_visits(
            Intent::UpdateRequested {
                id: before.id.clone(),
                changes: VisitChanges {
                    discount: Some(50.0),
                    ..Default::default()
                },
            },
            &mut screen,
        )
        .unwrap();

    let after = office.visits().get(&before.id).unwrap();
    assert_eq!(after.discount, 50.0);
    assert_eq!(after.price, before.price);
    assert_eq!(after.patient_name, before.patient_name);
    assert_eq!(after.final_price, before.final_price);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn test_search_matches_first_and_last_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut office = open_at(&dir.path().join("office.db"));
    let mut screen = Snapshot::default();

    office
        .dispatch_patients(Intent::SearchChanged("john".into()), &mut screen)
        .unwrap();

    let names: Vec<String> = screen.view.iter().map(|p| p.full_name()).collect();
    assert_eq!(names, vec!["John Smith", "Sarah Johnson"]);

    // the view follows later mutations with the same search applied
    let sarah = screen.view[1].id.clone();
    office
        .dispatch_patients(Intent::DeleteRequested(sarah), &mut screen)
        .unwrap();
    assert_eq!(screen.view.len(), 1);
    assert_eq!(screen.stats.unwrap().total_patients, 2);
}
