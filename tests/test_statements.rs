use snapdb::storage::Value;
use snapdb::{Error, ErrorKind, ExecutionEngine, QueryResult};

fn select(engine: &mut ExecutionEngine, sql: &str) -> (Vec<String>, Vec<Vec<Value>>) {
    match engine.execute_sql(sql).unwrap() {
        QueryResult::RowSet { columns, rows } => (columns, rows),
        other => panic!("expected rows, got {:?}", other),
    }
}

fn affected(engine: &mut ExecutionEngine, sql: &str) -> usize {
    match engine.execute_sql(sql).unwrap() {
        QueryResult::RowCount { count } => count,
        other => panic!("expected a row count, got {:?}", other),
    }
}

fn students() -> ExecutionEngine {
    let mut engine = ExecutionEngine::new();
    engine
        .execute_sql("CREATE TABLE students (id INT, name TEXT, age INT);")
        .unwrap();
    for sql in [
        "INSERT INTO students VALUES (1, 'Alice', 22)",
        "INSERT INTO students VALUES (2, 'Bob', 19)",
        "INSERT INTO students VALUES (3, 'Charlie', 25)",
        "INSERT INTO students VALUES (4, 'Dana', 20)",
    ] {
        engine.execute_sql(sql).unwrap();
    }
    engine
}

#[test]
fn test_create_then_select_is_empty() {
    let mut engine = ExecutionEngine::new();
    engine
        .execute_sql("create table items (sku TEXT, qty integer, label VARCHAR)")
        .unwrap();

    let (columns, rows) = select(&mut engine, "SELECT * FROM items");
    assert_eq!(columns, vec!["sku", "qty", "label"]);
    assert!(rows.is_empty());
}

#[test]
fn test_insert_round_trips() {
    let mut engine = ExecutionEngine::new();
    engine
        .execute_sql("CREATE TABLE items (sku TEXT, qty INT)")
        .unwrap();
    engine
        .execute_sql("INSERT INTO items VALUES (42, '7')")
        .unwrap();

    let (_, rows) = select(&mut engine, "SELECT * FROM items");
    // TEXT keeps the literal form, INT parses text
    assert_eq!(rows, vec![vec![Value::from("42"), Value::Integer(7)]]);
}

#[test]
fn test_bare_number_keeps_literal_text_in_text_column() {
    let mut engine = ExecutionEngine::new();
    engine
        .execute_sql("CREATE TABLE t (code TEXT, n INT)")
        .unwrap();
    engine.execute_sql("INSERT INTO t VALUES (007, 007)").unwrap();
    engine
        .execute_sql("INSERT INTO t VALUES (99999999999999999999, 2)")
        .unwrap();

    let (_, rows) = select(&mut engine, "SELECT code, n FROM t");
    assert_eq!(
        rows,
        vec![
            vec![Value::from("007"), Value::Integer(7)],
            vec![Value::from("99999999999999999999"), Value::Integer(2)],
        ]
    );

    // Numeric comparison still applies to the literal text
    let (_, rows) = select(&mut engine, "SELECT n FROM t WHERE code = 7");
    assert_eq!(rows, vec![vec![Value::Integer(7)]]);
}

#[test]
fn test_oversized_integer_is_invalid_value() {
    let mut engine = ExecutionEngine::new();
    engine
        .execute_sql("CREATE TABLE t (code TEXT, n INT)")
        .unwrap();

    for sql in [
        "INSERT INTO t VALUES ('x', 99999999999999999999)",
        "INSERT INTO t VALUES ('x', '99999999999999999999')",
        "UPDATE t SET n = 99999999999999999999",
    ] {
        let err = engine.execute_sql(sql).unwrap_err();
        assert!(
            matches!(
                err,
                Error::InvalidValue { ref column, ref value }
                    if column == "n" && value == "99999999999999999999"
            ),
            "{} -> {}",
            sql,
            err
        );
    }
    assert_eq!(engine.store().table("t").unwrap().row_count(), 0);
}

#[test]
fn test_insert_with_column_list_fills_nulls() {
    let mut engine = students();
    engine
        .execute_sql("INSERT INTO students (name, id) VALUES ('Eve', 5)")
        .unwrap();

    let (_, rows) = select(&mut engine, "SELECT id, name, age FROM students WHERE id = 5");
    assert_eq!(
        rows,
        vec![vec![Value::Integer(5), Value::from("Eve"), Value::Null]]
    );
}

#[test]
fn test_where_filters_in_insertion_order() {
    let mut engine = students();

    let (_, rows) = select(&mut engine, "SELECT name FROM students WHERE age > 19");
    let names: Vec<String> = rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(names, vec!["Alice", "Charlie", "Dana"]);

    let (_, rows) = select(&mut engine, "SELECT name FROM students WHERE name < 'C'");
    assert_eq!(rows.len(), 2);

    let (_, rows) = select(&mut engine, "SELECT * FROM students WHERE name = 'Nobody'");
    assert!(rows.is_empty());
}

#[test]
fn test_update_touches_only_matching_rows() {
    let mut engine = students();
    let (_, before) = select(&mut engine, "SELECT * FROM students");

    assert_eq!(
        affected(&mut engine, "UPDATE students SET age = 30, name = 'Old' WHERE age > 21"),
        2
    );

    let (_, after) = select(&mut engine, "SELECT * FROM students");
    assert_eq!(after[1], before[1]);
    assert_eq!(after[3], before[3]);
    assert_eq!(
        after[0],
        vec![Value::Integer(1), Value::from("Old"), Value::Integer(30)]
    );
}

#[test]
fn test_update_unknown_column_changes_nothing() {
    let mut engine = students();
    let before = engine.store().clone();

    let err = engine
        .execute_sql("UPDATE students SET age = 1, email = 'x' WHERE id = 1")
        .unwrap_err();
    assert!(matches!(err, Error::UnknownColumn { ref column, .. } if column == "email"));
    assert_eq!(engine.store(), &before);
}

#[test]
fn test_delete() {
    let mut engine = students();

    assert_eq!(affected(&mut engine, "DELETE FROM students WHERE id = 2"), 1);
    let (_, rows) = select(&mut engine, "SELECT id FROM students");
    assert_eq!(
        rows,
        vec![
            vec![Value::Integer(1)],
            vec![Value::Integer(3)],
            vec![Value::Integer(4)]
        ]
    );

    assert_eq!(affected(&mut engine, "DELETE FROM students"), 3);
    let (_, rows) = select(&mut engine, "SELECT * FROM students");
    assert!(rows.is_empty());
}

#[test]
fn test_invalid_integer_leaves_row_count() {
    let mut engine = students();

    let err = engine
        .execute_sql("INSERT INTO students VALUES (5, 'Eve', 'twenty')")
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { ref column, .. } if column == "age"));
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(engine.store().table("students").unwrap().row_count(), 4);
}

#[test]
fn test_arity_mismatch() {
    let mut engine = students();

    assert!(matches!(
        engine.execute_sql("INSERT INTO students VALUES (5, 'Eve')"),
        Err(Error::ArityMismatch {
            expected: 3,
            found: 2
        })
    ));
}

#[test]
fn test_alter_table() {
    let mut engine = students();

    let result = engine
        .execute_sql("ALTER TABLE students ADD COLUMN email TEXT")
        .unwrap();
    assert_eq!(result.warning(), None);
    let (columns, rows) = select(&mut engine, "SELECT * FROM students WHERE id = 1");
    assert_eq!(columns, vec!["id", "name", "age", "email"]);
    assert_eq!(rows[0][3], Value::Null);

    engine
        .execute_sql("ALTER TABLE students DROP COLUMN age")
        .unwrap();
    let (columns, rows) = select(&mut engine, "SELECT * FROM students WHERE id = 1");
    assert_eq!(columns, vec!["id", "name", "email"]);
    assert_eq!(rows[0].len(), 3);

    engine
        .execute_sql("ALTER TABLE students MODIFY COLUMN name INT")
        .unwrap();
    let (_, rows) = select(&mut engine, "SELECT name FROM students WHERE id = 1");
    assert_eq!(rows[0][0], Value::from("Alice"));
}

#[test]
fn test_add_existing_column_is_a_warning() {
    let mut engine = students();
    let before = engine.store().clone();

    let result = engine
        .execute_sql("ALTER TABLE students ADD COLUMN name TEXT")
        .unwrap();
    assert!(result.warning().is_some());
    assert_eq!(engine.store(), &before);

    let result = engine
        .execute_sql("ALTER TABLE students DROP COLUMN nope")
        .unwrap();
    assert!(result.warning().is_some());
}

#[test]
fn test_drop_table() {
    let mut engine = students();

    engine.execute_sql("DROP TABLE students").unwrap();
    let err = engine.execute_sql("SELECT * FROM students").unwrap_err();
    assert!(matches!(err, Error::UnknownTable(_)));
    assert_eq!(err.kind(), ErrorKind::Catalog);
}

#[test]
fn test_syntax_errors() {
    let mut engine = students();

    for sql in [
        "",
        "SELECT FROM students",
        "SELECT * FROM students WHERE",
        "INSERT INTO students VALUES (1, 'a', 2",
        "UPDATE students age = 1",
        "SELECT * FROM students WHERE age > 1 AND id = 2",
        "FROBNICATE",
    ] {
        let err = engine.execute_sql(sql).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "{:?} -> {}", sql, err);
    }
}

#[test]
fn test_unsupported_operator() {
    let mut engine = students();

    assert!(matches!(
        engine.execute_sql("SELECT * FROM students WHERE age >= 20"),
        Err(Error::UnsupportedOperator(op)) if op == ">="
    ));
}
