use enrollment_core::db::{open_db, open_db_in_memory};
use enrollment_core::{run_demo, DemoReport, EnrollmentService, SqliteEnrollmentRepository};

#[test]
fn demo_prints_subject_then_enrolled_students() {
    let conn = open_db_in_memory().unwrap();
    let service = EnrollmentService::new(SqliteEnrollmentRepository::try_new(&conn).unwrap());

    let mut out = Vec::new();
    let report = run_demo(&service, &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), ".NET\nJohn\nJane\n");
    assert_eq!(
        report,
        DemoReport {
            subject_id: 1,
            student_ids: vec![1, 2],
        }
    );

    let subjects = service.get_all_subjects().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].title, ".NET");
}

#[test]
fn rerunning_demo_on_same_file_appends_new_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enrollment.sqlite3");

    for run in 1..=2_i64 {
        let conn = open_db(&path).unwrap();
        let service = EnrollmentService::new(SqliteEnrollmentRepository::try_new(&conn).unwrap());
        let mut out = Vec::new();
        let report = run_demo(&service, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), ".NET\nJohn\nJane\n");
        assert_eq!(report.subject_id, run);
        assert_eq!(service.get_all_subjects().unwrap().len(), run as usize);
    }
}
