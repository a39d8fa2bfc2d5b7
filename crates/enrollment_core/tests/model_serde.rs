use chrono::{TimeZone, Utc};
use enrollment_core::{CapacityUsage, NewStudent, Student, Subject};

#[test]
fn unloaded_relations_are_omitted_from_json() {
    let subject = Subject {
        id: 3,
        title: "Compilers".to_string(),
        maximum_capacity: 15,
        enrolled_students: None,
    };

    let value = serde_json::to_value(&subject).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "id": 3, "title": "Compilers", "maximum_capacity": 15 })
    );

    let parsed: Subject = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, subject);
}

#[test]
fn loaded_relations_are_serialized() {
    let date = Utc.with_ymd_and_hms(2024, 9, 1, 8, 30, 0).unwrap();
    let student = Student {
        id: 7,
        name: "Ada".to_string(),
        enrollment_date: date,
        enrolled_subjects: Some(vec![Subject {
            id: 1,
            title: "Rust".to_string(),
            maximum_capacity: 30,
            enrolled_students: None,
        }]),
    };

    let value = serde_json::to_value(&student).unwrap();
    assert_eq!(value["enrollment_date"], "2024-09-01T08:30:00Z");
    assert_eq!(value["enrolled_subjects"][0]["title"], "Rust");
    assert!(student.matches(&NewStudent::new("Ada", date)));
}

#[test]
fn over_capacity_requires_loaded_students() {
    let mut subject = Subject {
        id: 1,
        title: "Seminar".to_string(),
        maximum_capacity: 1,
        enrolled_students: None,
    };
    assert_eq!(subject.over_capacity_by(), None);

    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let student = |id: i64, name: &str| Student {
        id,
        name: name.to_string(),
        enrollment_date: date,
        enrolled_subjects: None,
    };
    subject.enrolled_students = Some(vec![student(1, "A")]);
    assert_eq!(subject.over_capacity_by(), Some(0));

    subject.enrolled_students = Some(vec![student(1, "A"), student(2, "B"), student(3, "C")]);
    assert_eq!(subject.over_capacity_by(), Some(2));
}

#[test]
fn over_capacity_saturates_for_extreme_capacities() {
    let usage = |enrolled: i64, maximum_capacity: i64| CapacityUsage {
        enrolled,
        maximum_capacity,
    };

    assert_eq!(usage(1, i64::MIN).over_by(), i64::MAX);
    assert_eq!(usage(i64::MAX, -1).over_by(), i64::MAX);
    assert_eq!(usage(3, -2).over_by(), 5);
    assert_eq!(usage(0, i64::MAX).over_by(), 0);
    assert_eq!(usage(2, 2).over_by(), 0);

    let subject = Subject {
        id: 1,
        title: "Unbounded".to_string(),
        maximum_capacity: i64::MIN,
        enrolled_students: Some(Vec::new()),
    };
    assert_eq!(subject.over_capacity_by(), Some(i64::MAX));
}
