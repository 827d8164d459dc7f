use log::{debug, info};
use rusqlite::{params, Connection, Row};

use crate::error::RosterError;
use crate::models::{Student, StudentInput};

use super::connection::StorageGateway;

/// The only component that issues statements against the `students` table.
/// Every method opens its own connection through the gateway, runs exactly
/// one statement and lets the connection drop before returning, so nothing
/// stays open between calls even when a statement fails.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    gateway: StorageGateway,
}

impl StudentRepository {
    /// Build a repository that opens every connection through `gateway`.
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    /// Gateway used for every statement, exposed for startup reporting.
    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    /// Every stored student in SQLite's natural order. No `ORDER BY` is
    /// imposed; rowid order is stable while the table is unchanged.
    pub fn list_all(&self) -> Result<Vec<Student>, RosterError> {
        let conn = self.gateway.connect()?;
        debug!("listing all students");
        self.collect_students(&conn, "SELECT id, name, course, mobile FROM students", [])
    }

    /// Insert one record and return the id SQLite assigned. Inputs are passed
    /// through untouched; callers validate before getting here.
    pub fn insert(&self, input: &StudentInput) -> Result<i64, RosterError> {
        let conn = self.gateway.connect()?;
        conn.execute(
            "INSERT INTO students (name, course, mobile) VALUES (?1, ?2, ?3)",
            params![input.name, input.course, input.mobile],
        )
        .map_err(|err| self.gateway.classify(err))?;

        let id = conn.last_insert_rowid();
        info!("inserted student {id}");
        Ok(id)
    }

    /// Replace name, course and mobile of the record with `id`. Fails with
    /// [`RosterError::NotFound`] when no row carries that id.
    pub fn update_by_id(&self, id: i64, input: &StudentInput) -> Result<(), RosterError> {
        let conn = self.gateway.connect()?;
        let updated = conn
            .execute(
                "UPDATE students SET name = ?1, course = ?2, mobile = ?3 WHERE id = ?4",
                params![input.name, input.course, input.mobile, id],
            )
            .map_err(|err| self.gateway.classify(err))?;

        if updated == 0 {
            Err(RosterError::NotFound(id))
        } else {
            info!("updated student {id}");
            Ok(())
        }
    }

    /// Remove the record with `id`; same not-found contract as updates.
    pub fn delete_by_id(&self, id: i64) -> Result<(), RosterError> {
        let conn = self.gateway.connect()?;
        let deleted = conn
            .execute("DELETE FROM students WHERE id = ?1", params![id])
            .map_err(|err| self.gateway.classify(err))?;

        if deleted == 0 {
            Err(RosterError::NotFound(id))
        } else {
            info!("deleted student {id}");
            Ok(())
        }
    }

    /// Records whose name equals `name` byte for byte. SQLite's default
    /// `BINARY` collation keeps the comparison case-sensitive.
    pub fn find_by_exact_name(&self, name: &str) -> Result<Vec<Student>, RosterError> {
        let conn = self.gateway.connect()?;
        debug!("searching students named {name:?}");
        self.collect_students(
            &conn,
            "SELECT id, name, course, mobile FROM students WHERE name = ?1",
            [name],
        )
    }

    /// The record with `id`, or `None` if it is gone. Workflows use it to
    /// re-check an id before mutating.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Student>, RosterError> {
        let conn = self.gateway.connect()?;
        let mut students = self.collect_students(
            &conn,
            "SELECT id, name, course, mobile FROM students WHERE id = ?1",
            [id],
        )?;
        Ok(students.pop())
    }

    fn collect_students<P: rusqlite::Params>(
        &self,
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> Result<Vec<Student>, RosterError> {
        let mut stmt = conn.prepare(sql).map_err(|err| self.gateway.classify(err))?;
        let students = stmt
            .query_map(params, student_from_row)
            .map_err(|err| self.gateway.classify(err))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| self.gateway.classify(err))?;
        Ok(students)
    }
}

/// Text columns are nullable in the schema, so NULL reads back as "".
fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        course: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        mobile: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn repository(temp: &TempDir) -> StudentRepository {
        let gateway = StorageGateway::new(temp.path().join("students.sqlite"));
        gateway.initialize().unwrap();
        StudentRepository::new(gateway)
    }

    fn input(name: &str, course: &str, mobile: &str) -> StudentInput {
        StudentInput::new(name, course, mobile)
    }

    #[test]
    fn insert_assigns_fresh_ids() {
        let temp = TempDir::new().unwrap();
        let repo = repository(&temp);

        let first = repo.insert(&input("Ann", "Math", "555-1111")).unwrap();
        let second = repo.insert(&input("Bob", "Biology", "555-2222")).unwrap();
        assert_ne!(first, second);

        let students = repo.list_all().unwrap();
        assert_eq!(
            students,
            vec![
                Student {
                    id: first,
                    name: "Ann".into(),
                    course: "Math".into(),
                    mobile: "555-1111".into(),
                },
                Student {
                    id: second,
                    name: "Bob".into(),
                    course: "Biology".into(),
                    mobile: "555-2222".into(),
                },
            ]
        );
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let temp = TempDir::new().unwrap();
        let repo = repository(&temp);

        let first = repo.insert(&input("Ann", "Math", "1")).unwrap();
        repo.delete_by_id(first).unwrap();
        let second = repo.insert(&input("Ann", "Math", "1")).unwrap();

        assert!(second > first);
    }

    #[test]
    fn update_touches_only_the_target_record() {
        let temp = TempDir::new().unwrap();
        let repo = repository(&temp);
        let ann = repo.insert(&input("Ann", "Math", "555-1111")).unwrap();
        let bob = repo.insert(&input("Bob", "Biology", "555-2222")).unwrap();

        repo.update_by_id(ann, &input("Ann", "Physics", "555-9999"))
            .unwrap();

        let updated = repo.find_by_id(ann).unwrap().unwrap();
        assert_eq!(updated.course, "Physics");
        assert_eq!(updated.mobile, "555-9999");
        let untouched = repo.find_by_id(bob).unwrap().unwrap();
        assert_eq!(untouched.course, "Biology");
        assert_eq!(untouched.mobile, "555-2222");
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let temp = TempDir::new().unwrap();
        let repo = repository(&temp);
        repo.insert(&input("Ann", "Math", "1")).unwrap();

        assert!(matches!(
            repo.update_by_id(42, &input("X", "Math", "2")),
            Err(RosterError::NotFound(42))
        ));
        assert!(matches!(
            repo.delete_by_id(42),
            Err(RosterError::NotFound(42))
        ));
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn exact_name_search_ignores_near_matches() {
        let temp = TempDir::new().unwrap();
        let repo = repository(&temp);
        let ann = repo.insert(&input("Ann", "Math", "1")).unwrap();
        repo.insert(&input("Anna", "Math", "2")).unwrap();
        repo.insert(&input("ann", "Math", "3")).unwrap();
        repo.insert(&input("Ann ", "Math", "4")).unwrap();
        let second_ann = repo.insert(&input("Ann", "Physics", "5")).unwrap();

        let ids: Vec<i64> = repo
            .find_by_exact_name("Ann")
            .unwrap()
            .into_iter()
            .map(|student| student.id)
            .collect();
        assert_eq!(ids, vec![ann, second_ann]);
        assert!(repo.find_by_exact_name("Zed").unwrap().is_empty());
    }

    #[test]
    fn null_columns_load_as_empty_text() {
        let temp = TempDir::new().unwrap();
        let repo = repository(&temp);
        let conn = repo.gateway().connect().unwrap();
        conn.execute("INSERT INTO students (name) VALUES ('Legacy')", [])
            .unwrap();
        drop(conn);

        let students = repo.list_all().unwrap();
        assert_eq!(students[0].name, "Legacy");
        assert_eq!(students[0].course, "");
        assert_eq!(students[0].mobile, "");
    }

    #[test]
    fn operations_fail_with_connection_error_when_store_is_gone() {
        let temp = TempDir::new().unwrap();
        let repo = StudentRepository::new(StorageGateway::new(
            temp.path().join("absent").join("students.sqlite"),
        ));

        assert!(matches!(
            repo.list_all(),
            Err(RosterError::Connection { .. })
        ));
        assert!(matches!(
            repo.insert(&input("Ann", "Math", "1")),
            Err(RosterError::Connection { .. })
        ));
    }

    #[test]
    fn listing_a_file_that_is_not_a_database_is_a_connection_error() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("garbage.sqlite");
        fs::write(&location, "not a database ".repeat(128)).unwrap();
        let repo = StudentRepository::new(StorageGateway::new(&location));

        assert!(matches!(
            repo.list_all(),
            Err(RosterError::Connection { .. })
        ));
    }
}
