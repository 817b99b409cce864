//! SQL text shared by both backends.
//!
//! Both dialects use `?` placeholders, so every statement here is built once
//! and only the upsert clauses differ per [`Dialect`]. The view query is
//! assembled with a [`QueryBuilder`] for whichever backend runs it.

use sqlx::{Database, Encode, QueryBuilder, Type};

use crate::dto::{ResultQuery, ResultView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

const PERSON_UPDATE_COLUMNS: &[&str] = &[
    "bib",
    "first_name",
    "last_name",
    "birthdate",
    "age",
    "gender",
    "age_group",
    "distance",
    "anonymous",
];

const RESULT_UPDATE_COLUMNS: &[&str] = &[
    "seconds",
    "milliseconds",
    "chip_seconds",
    "chip_milliseconds",
    "segment",
    "ranking",
    "age_ranking",
    "gender_ranking",
    "finish",
    "result_type",
    "division",
    "division_ranking",
];

const ROW_COLUMNS: &str = r#"
    p.stable_id, p.bib, p.first_name, p.last_name, p.birthdate, p.age,
    p.gender, p.age_group, p.distance, p.anonymous,
    r.location, r.occurrence, r.seconds, r.milliseconds,
    r.chip_seconds, r.chip_milliseconds, r.segment,
    r.ranking, r.age_ranking, r.gender_ranking, r.finish,
    r.result_type, r.division, r.division_ranking
"#;

const OUTER_ROW_COLUMNS: &str = r#"
    stable_id, bib, first_name, last_name, birthdate, age,
    gender, age_group, distance, anonymous,
    location, occurrence, seconds, milliseconds,
    chip_seconds, chip_milliseconds, segment,
    ranking, age_ranking, gender_ranking, finish,
    result_type, division, division_ranking
"#;

pub const PERSON_COLUMNS: &str = r#"
    id, event_year_id, stable_id, bib, first_name, last_name, birthdate,
    age, gender, age_group, distance, anonymous
"#;

pub const SELECT_PERSON_IDS: &str =
    "SELECT stable_id, id FROM person WHERE event_year_id = ?";

pub const SELECT_PERSON_ID: &str =
    "SELECT id FROM person WHERE event_year_id = ? AND stable_id = ?";

pub const DELETE_RESULT: &str = r#"
    DELETE FROM result
    WHERE location = ? AND occurrence = ?
      AND person_id IN (SELECT id FROM person WHERE event_year_id = ? AND bib = ?)
"#;

pub const DELETE_EVENT_RESULTS: &str = r#"
    DELETE FROM result
    WHERE person_id IN (SELECT id FROM person WHERE event_year_id = ?)
"#;

pub const DELETE_ORPHANED_PERSONS: &str = r#"
    DELETE FROM person
    WHERE event_year_id = ?
      AND NOT EXISTS (SELECT 1 FROM result WHERE result.person_id = person.id)
"#;

pub const DELETE_EVENT_PERSONS: &str = "DELETE FROM person WHERE event_year_id = ?";

pub const DELETE_PERSON: &str = "DELETE FROM person WHERE event_year_id = ? AND stable_id = ?";

pub const COUNT_RESULTS: &str = r#"
    SELECT COUNT(*) FROM result r
    INNER JOIN person p ON p.id = r.person_id
    WHERE p.event_year_id = ?
"#;

pub const COUNT_PERSONS: &str = "SELECT COUNT(*) FROM person WHERE event_year_id = ?";

pub fn select_person() -> String {
    format!(
        "SELECT {} FROM person WHERE event_year_id = ? AND stable_id = ?",
        PERSON_COLUMNS
    )
}

pub fn select_persons() -> String {
    format!(
        "SELECT {} FROM person WHERE event_year_id = ? ORDER BY bib, stable_id",
        PERSON_COLUMNS
    )
}

/// Person upsert keyed by `(event_year_id, stable_id)`.
///
/// Binds: event_year_id, stable_id, bib, first_name, last_name, birthdate,
/// age, gender, age_group, distance, anonymous.
pub fn upsert_person(dialect: Dialect) -> String {
    let mut sql = String::from(
        r#"INSERT INTO person (
            event_year_id, stable_id, bib, first_name, last_name, birthdate,
            age, gender, age_group, distance, anonymous
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    );
    sql.push_str(&conflict_clause(
        dialect,
        "event_year_id, stable_id",
        PERSON_UPDATE_COLUMNS,
    ));
    sql
}

/// Result upsert keyed by `(person_id, location, occurrence)`.
///
/// Binds: person_id, location, occurrence, then the update columns in
/// declaration order.
pub fn upsert_result(dialect: Dialect) -> String {
    let mut sql = String::from(
        r#"INSERT INTO result (
            person_id, location, occurrence, seconds, milliseconds,
            chip_seconds, chip_milliseconds, segment, ranking, age_ranking,
            gender_ranking, finish, result_type, division, division_ranking
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    );
    sql.push_str(&conflict_clause(
        dialect,
        "person_id, location, occurrence",
        RESULT_UPDATE_COLUMNS,
    ));
    sql
}

fn conflict_clause(dialect: Dialect, key: &str, columns: &[&str]) -> String {
    match dialect {
        Dialect::MySql => {
            let assignments = columns
                .iter()
                .map(|c| format!("{c} = VALUES({c})"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(" ON DUPLICATE KEY UPDATE {}", assignments)
        }
        Dialect::Sqlite => {
            let assignments = columns
                .iter()
                .map(|c| format!("{c} = excluded.{c}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(" ON CONFLICT ({}) DO UPDATE SET {}", key, assignments)
        }
    }
}

/// Appends the SELECT for any view/filter/paging combination to `builder`.
///
/// Rows are ordered by gun time, then by bib, location and occurrence so that
/// pages never overlap when several reads share a time.
pub fn push_select_results<'a, DB>(
    builder: &mut QueryBuilder<'a, DB>,
    event_year_id: i64,
    query: &ResultQuery,
) where
    DB: Database,
    i64: Encode<'a, DB> + Type<DB>,
    bool: Encode<'a, DB> + Type<DB>,
    String: Encode<'a, DB> + Type<DB>,
{
    match query.view {
        ResultView::All | ResultView::Finish => {
            builder.push("SELECT ");
            builder.push(ROW_COLUMNS);
            builder.push(" FROM result r INNER JOIN person p ON p.id = r.person_id");
            push_filters(builder, event_year_id, query);
            builder.push(" ORDER BY r.seconds, r.milliseconds, p.bib, r.location, r.occurrence");
        }
        ResultView::Last => {
            builder.push("SELECT ");
            builder.push(OUTER_ROW_COLUMNS);
            builder.push(" FROM (SELECT ");
            builder.push(ROW_COLUMNS);
            builder.push(
                r#",
                    ROW_NUMBER() OVER (
                        PARTITION BY r.person_id
                        ORDER BY r.occurrence DESC, r.seconds DESC,
                                 r.milliseconds DESC, r.location DESC
                    ) AS row_rank
                FROM result r
                INNER JOIN person p ON p.id = r.person_id"#,
            );
            push_filters(builder, event_year_id, query);
            builder.push(
                r#"
            ) ranked
            WHERE row_rank = 1
            ORDER BY seconds, milliseconds, bib, location, occurrence"#,
            );
        }
    }

    if let Some((limit, offset)) = query.pagination.window() {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);
    }
}

fn push_filters<'a, DB>(builder: &mut QueryBuilder<'a, DB>, event_year_id: i64, query: &ResultQuery)
where
    DB: Database,
    i64: Encode<'a, DB> + Type<DB>,
    bool: Encode<'a, DB> + Type<DB>,
    String: Encode<'a, DB> + Type<DB>,
{
    builder.push(" WHERE p.event_year_id = ");
    builder.push_bind(event_year_id);

    if query.view == ResultView::Finish {
        builder.push(" AND r.finish = ");
        builder.push_bind(true);
    }

    if let Some(ref distance) = query.distance {
        builder.push(" AND p.distance = ");
        builder.push_bind(distance.clone());
    }

    if let Some(ref bib) = query.bib {
        builder.push(" AND p.bib = ");
        builder.push_bind(bib.clone());
    }
}

/// Every read for one bib, regardless of view filters or paging.
pub fn select_bib_results() -> String {
    format!(
        r#"SELECT {ROW_COLUMNS}
        FROM result r
        INNER JOIN person p ON p.id = r.person_id
        WHERE p.event_year_id = ? AND p.bib = ?
        ORDER BY r.seconds, r.milliseconds, r.location, r.occurrence"#
    )
}

pub fn select_result() -> String {
    format!(
        r#"SELECT {ROW_COLUMNS}
        FROM result r
        INNER JOIN person p ON p.id = r.person_id
        WHERE p.event_year_id = ? AND p.bib = ? AND r.location = ? AND r.occurrence = ?"#
    )
}
