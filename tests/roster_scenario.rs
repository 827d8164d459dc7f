use student_roster::workflows::{insert_student, search, EditSession, PendingDelete};
use student_roster::{RosterError, RosterView, StorageGateway, Student, StudentInput, StudentRepository};
use tempfile::TempDir;

fn open(temp: &TempDir) -> (StudentRepository, RosterView) {
    let gateway = StorageGateway::new(temp.path().join("database.db"));
    gateway.initialize().unwrap();
    let repo = StudentRepository::new(gateway);
    let view = RosterView::load(&repo).unwrap();
    (repo, view)
}

#[test]
fn insert_update_delete_round_trip() {
    let temp = TempDir::new().unwrap();
    let (repo, mut view) = open(&temp);

    let id = insert_student(
        &repo,
        &mut view,
        &StudentInput::new("Ann", "Math", "555-1111"),
    )
    .unwrap();
    assert_eq!(id, 1);
    assert_eq!(
        view.rows(),
        [Student {
            id: 1,
            name: "Ann".into(),
            course: "Math".into(),
            mobile: "555-1111".into(),
        }]
    );

    view.select_row(0);
    let session = EditSession::begin(&view).unwrap();
    session
        .submit(
            &repo,
            &mut view,
            &StudentInput::new("Ann", "Physics", "555-2222"),
        )
        .unwrap();
    assert_eq!(
        view.rows(),
        [Student {
            id: 1,
            name: "Ann".into(),
            course: "Physics".into(),
            mobile: "555-2222".into(),
        }]
    );

    view.select_row(0);
    let removed = PendingDelete::begin(&view)
        .unwrap()
        .confirm(&repo, &mut view)
        .unwrap();
    assert_eq!(removed.id, 1);
    assert!(view.is_empty());
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn update_leaves_other_records_alone() {
    let temp = TempDir::new().unwrap();
    let (repo, mut view) = open(&temp);
    for (name, course) in [("Ann", "Math"), ("Bob", "Biology"), ("Cid", "Astronomy")] {
        insert_student(&repo, &mut view, &StudentInput::new(name, course, "555")).unwrap();
    }
    let before = view.rows().to_vec();

    view.select_row(1);
    EditSession::begin(&view)
        .unwrap()
        .submit(&repo, &mut view, &StudentInput::new("Bea", "Physics", "777"))
        .unwrap();

    let after = view.rows();
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1].id, before[1].id);
    assert_eq!(after[1].name, "Bea");
}

#[test]
fn mutations_are_refused_without_a_selection() {
    let temp = TempDir::new().unwrap();
    let (repo, mut view) = open(&temp);
    insert_student(&repo, &mut view, &StudentInput::new("Ann", "Math", "1")).unwrap();
    view.reload(&repo).unwrap();

    assert!(matches!(EditSession::begin(&view), Err(RosterError::NoSelection)));
    assert!(matches!(PendingDelete::begin(&view), Err(RosterError::NoSelection)));
    assert_eq!(repo.list_all().unwrap().len(), 1);
}

#[test]
fn search_matches_exact_names_only() {
    let temp = TempDir::new().unwrap();
    let (repo, mut view) = open(&temp);
    for name in ["Ann", "Anna", "ann"] {
        insert_student(&repo, &mut view, &StudentInput::new(name, "Math", "1")).unwrap();
    }

    let outcome = search(&repo, &mut view, "Ann").unwrap();

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].name, "Ann");
    assert_eq!(view.highlight_count(), 1);
}

#[test]
fn unreachable_store_surfaces_a_connection_error() {
    let temp = TempDir::new().unwrap();
    let repo = StudentRepository::new(StorageGateway::new(temp.path().join("nope.db")));
    let mut view = RosterView::new();

    let err = view.reload(&repo).unwrap_err();
    assert!(matches!(err, RosterError::Connection { .. }));
    assert!(err.to_string().contains("nope.db"));
}
