//! Scenarios shared by the per-backend test files. Each takes a migrated
//! database and an event-year id the scenario may freely purge.

#![allow(dead_code)]

use std::collections::HashSet;

use results_storage::Database;
use results_storage::StorageError;
use results_storage::dto::{Pagination, ResultKey, ResultQuery, ResultView};
use results_storage::models::{TimingRow, UNRANKED};

pub fn row(stable_id: &str, bib: &str, location: &str, occurrence: i32, seconds: i64) -> TimingRow {
    TimingRow {
        stable_id: stable_id.to_string(),
        bib: bib.to_string(),
        first_name: format!("Runner{}", stable_id),
        last_name: "Tester".to_string(),
        birthdate: "1990-04-12".to_string(),
        age: 35,
        gender: "F".to_string(),
        age_group: "30-39".to_string(),
        distance: "10K".to_string(),
        anonymous: false,
        location: location.to_string(),
        occurrence,
        seconds,
        milliseconds: 0,
        chip_seconds: seconds,
        chip_milliseconds: 0,
        segment: None,
        ranking: UNRANKED,
        age_ranking: UNRANKED,
        gender_ranking: UNRANKED,
        finish: location == "Finish",
        result_type: 0,
        division: None,
        division_ranking: UNRANKED,
    }
}

/// Bibs {100, 106, 209, 287, 287}; 287 reads the finish mat twice.
pub fn five_reads() -> Vec<TimingRow> {
    vec![
        row("1", "100", "Finish", 1, 2100),
        row("2", "106", "Finish", 1, 2250),
        row("3", "209", "Finish", 1, 1980),
        row("4", "287", "Finish", 1, 1200),
        row("4", "287", "Finish", 2, 2420),
    ]
}

pub async fn reset(db: &Database, event_year_id: i64) {
    db.delete_event_results(event_year_id).await.unwrap();
    db.delete_participants(event_year_id, &[]).await.unwrap();
}

fn keys(rows: &[TimingRow]) -> Vec<(String, String, i32)> {
    rows.iter()
        .map(|r| (r.bib.clone(), r.location.clone(), r.occurrence))
        .collect()
}

pub async fn ingestion_is_idempotent(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let batch = five_reads();

    let stored = db.ingest_results(event_year_id, &batch).await.unwrap();
    assert_eq!(stored, batch);
    let first_pass = db.get_all(event_year_id, Pagination::unpaged()).await.unwrap();
    let first_people = db.get_participants(event_year_id).await.unwrap();

    db.ingest_results(event_year_id, &batch).await.unwrap();
    let second_pass = db.get_all(event_year_id, Pagination::unpaged()).await.unwrap();
    let second_people = db.get_participants(event_year_id).await.unwrap();

    assert_eq!(db.count_results(event_year_id).await.unwrap(), 5);
    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 4);
    assert_eq!(first_pass, second_pass);
    assert_eq!(first_people, second_people);
}

pub async fn composite_keys_stay_unique(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let mut batch = five_reads();
    batch.push(row("1", "100", "Finish", 1, 2099));
    batch.push(row("5", "311", "Half", 1, 900));
    db.ingest_results(event_year_id, &batch).await.unwrap();
    db.ingest_results(event_year_id, &batch).await.unwrap();

    let rows = db.get_all(event_year_id, Pagination::unpaged()).await.unwrap();
    let unique: HashSet<_> = keys(&rows).into_iter().collect();
    assert_eq!(unique.len(), rows.len());
    assert_eq!(rows.len(), 6);

    let people = db.get_participants(event_year_id).await.unwrap();
    let stable_ids: HashSet<_> = people.iter().map(|p| p.stable_id.clone()).collect();
    assert_eq!(stable_ids.len(), people.len());
    assert_eq!(people.len(), 5);

    // Later duplicate in the batch wins.
    let updated = db
        .get_result(event_year_id, &ResultKey::new("100", "Finish", 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.seconds, 2099);
}

pub async fn reingestion_updates_person_in_place(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    db.ingest_results(event_year_id, &[row("10", "209", "Finish", 1, 1900)])
        .await
        .unwrap();
    let before = db
        .get_participant(event_year_id, "10")
        .await
        .unwrap()
        .unwrap();

    let mut moved = row("10", "209b", "Finish", 1, 1890);
    moved.age = 36;
    db.ingest_results(event_year_id, &[moved]).await.unwrap();

    let people = db.get_participants(event_year_id).await.unwrap();
    assert_eq!(people.len(), 1);
    let after = &people[0];
    assert_eq!(after.id, before.id);
    assert_eq!(after.stable_id, "10");
    assert_eq!(after.bib, "209b");
    assert_eq!(after.age, 36);

    let reads = db.get_bib_results(event_year_id, "209b").await.unwrap();
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].seconds, 1890);
    assert!(db.get_bib_results(event_year_id, "209").await.unwrap().is_empty());
}

pub async fn new_participant_repeated_in_batch(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    // An existing participant first, so the driver's insert id is stale by
    // the time the repeated newcomer takes the update branch.
    db.ingest_results(event_year_id, &[row("1", "100", "Start", 1, 0)])
        .await
        .unwrap();

    let batch = vec![
        row("9", "900", "Start", 1, 0),
        row("1", "100", "Finish", 1, 2000),
        row("9", "900", "Half", 1, 1000),
        row("9", "900", "Finish", 1, 2100),
    ];
    db.ingest_results(event_year_id, &batch).await.unwrap();

    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 2);
    assert_eq!(db.get_bib_results(event_year_id, "900").await.unwrap().len(), 3);
    assert_eq!(db.get_bib_results(event_year_id, "100").await.unwrap().len(), 2);
}

pub async fn last_view_picks_highest_occurrence(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    db.ingest_results(event_year_id, &five_reads()).await.unwrap();

    let all = db.get_all(event_year_id, Pagination::unpaged()).await.unwrap();
    assert_eq!(all.len(), 5);

    let last = db.get_last(event_year_id, Pagination::unpaged()).await.unwrap();
    assert_eq!(last.len(), 4);
    let bibs: Vec<_> = last.iter().map(|r| r.bib.as_str()).collect();
    assert_eq!(bibs, vec!["209", "100", "106", "287"]);
    let bib_287 = last.iter().find(|r| r.bib == "287").unwrap();
    assert_eq!(bib_287.occurrence, 2);
    assert_eq!(bib_287.seconds, 2420);
}

pub async fn views_are_consistent(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let mut batch = five_reads();
    batch.push(row("1", "100", "Half", 1, 1000));
    batch.push(row("6", "412", "Half", 1, 1100));
    db.ingest_results(event_year_id, &batch).await.unwrap();

    let all = db.get_all(event_year_id, Pagination::unpaged()).await.unwrap();
    let finish = db.get_finish(event_year_id, Pagination::unpaged()).await.unwrap();
    let last = db.get_last(event_year_id, Pagination::unpaged()).await.unwrap();

    assert!(all.len() >= finish.len());
    assert!(all.len() >= last.len());
    assert_eq!(finish.len(), 5);
    assert!(finish.iter().all(|r| r.finish));
    assert_eq!(last.len(), 5);

    let distinct: HashSet<_> = last.iter().map(|r| r.stable_id.clone()).collect();
    assert_eq!(distinct.len(), last.len());

    for view in [&all, &finish, &last] {
        assert!(view.windows(2).all(|w| w[0].seconds <= w[1].seconds));
    }
}

pub async fn distance_views(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let mut batch = five_reads();
    let mut short = vec![
        row("7", "501", "Turn", 1, 600),
        row("7", "501", "Finish", 1, 1300),
        row("8", "502", "Finish", 1, 1250),
    ];
    for r in &mut short {
        r.distance = "5K".to_string();
    }
    batch.extend(short);
    db.ingest_results(event_year_id, &batch).await.unwrap();

    let every = db
        .get_distance(event_year_id, "5K", ResultView::All, Pagination::unpaged())
        .await
        .unwrap();
    assert_eq!(every.len(), 3);
    assert!(every.iter().all(|r| r.distance == "5K"));

    let last = db
        .get_distance(event_year_id, "5K", ResultView::Last, Pagination::unpaged())
        .await
        .unwrap();
    assert_eq!(last.len(), 2);
    assert_eq!(last[0].bib, "502");
    assert_eq!(last[1].bib, "501");
    assert_eq!(last[1].location, "Finish");

    let ten_k = db
        .get_distance(event_year_id, "10K", ResultView::Last, Pagination::unpaged())
        .await
        .unwrap();
    assert_eq!(ten_k.len(), 4);

    let none = db
        .get_distance(event_year_id, "Marathon", ResultView::All, Pagination::unpaged())
        .await
        .unwrap();
    assert!(none.is_empty());
}

pub async fn pages_concatenate_to_unpaged(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let batch: Vec<_> = (0..23)
        .map(|i| {
            let id = i.to_string();
            // Pairs of equal times exercise the tie-break ordering.
            row(&id, &format!("{}", 1000 + i), "Finish", 1, 1800 + (i / 2) as i64)
        })
        .collect();
    db.ingest_results(event_year_id, &batch).await.unwrap();

    for view in [ResultView::All, ResultView::Finish, ResultView::Last] {
        let unpaged = db
            .get_results(event_year_id, &ResultQuery::view(view))
            .await
            .unwrap();
        assert_eq!(unpaged.len(), 23);

        let mut collected = Vec::new();
        let mut page = 0;
        loop {
            let rows = db
                .get_results(event_year_id, &ResultQuery::view(view).paginate(5, page))
                .await
                .unwrap();
            if rows.is_empty() {
                break;
            }
            assert!(rows.len() <= 5);
            collected.extend(rows);
            page += 1;
        }

        assert_eq!(page, 5);
        assert_eq!(keys(&collected), keys(&unpaged));
    }

    let beyond = db
        .get_results(event_year_id, &ResultQuery::all().paginate(5, 40))
        .await
        .unwrap();
    assert!(beyond.is_empty());

    let ignored_page = db
        .get_results(event_year_id, &ResultQuery::all().paginate(0, 3))
        .await
        .unwrap();
    assert_eq!(ignored_page.len(), 23);
}

pub async fn bib_lookup_returns_full_history(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let mut batch = five_reads();
    batch.push(row("4", "287", "Half", 1, 600));
    db.ingest_results(event_year_id, &batch).await.unwrap();

    let history = db.get_bib_results(event_year_id, "287").await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].location, "Half");

    let all_for_bib = db
        .get_results(event_year_id, &ResultQuery::all().with_bib("287").paginate(1, 0))
        .await
        .unwrap();
    assert_eq!(all_for_bib.len(), 1);

    assert!(db.get_bib_results(event_year_id, "999").await.unwrap().is_empty());
}

pub async fn missing_single_rows_are_absent(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    db.ingest_results(event_year_id, &five_reads()).await.unwrap();

    let missing = db
        .get_result(event_year_id, &ResultKey::new("287", "Finish", 3))
        .await
        .unwrap();
    assert!(missing.is_none());
    assert!(db.get_participant(event_year_id, "nope").await.unwrap().is_none());

    let found = db
        .get_result(event_year_id, &ResultKey::new("287", "Finish", 2))
        .await
        .unwrap();
    assert_eq!(found.unwrap().seconds, 2420);
}

pub async fn delete_named_results(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    db.ingest_results(event_year_id, &five_reads()).await.unwrap();

    let deleted = db
        .delete_results(
            event_year_id,
            &[
                ResultKey::new("287", "Finish", 2),
                ResultKey::new("100", "Finish", 1),
                ResultKey::new("100", "Finish", 9),
            ],
        )
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(db.count_results(event_year_id).await.unwrap(), 3);
    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 4);

    let last = db.get_last(event_year_id, Pagination::unpaged()).await.unwrap();
    let bib_287 = last.iter().find(|r| r.bib == "287").unwrap();
    assert_eq!(bib_287.occurrence, 1);
}

pub async fn purge_cascades_within_event_year(db: &Database, event_year_id: i64, other_year_id: i64) {
    reset(db, event_year_id).await;
    reset(db, other_year_id).await;
    db.ingest_results(event_year_id, &five_reads()).await.unwrap();
    db.ingest_results(other_year_id, &five_reads()).await.unwrap();

    let deleted = db.delete_event_results(event_year_id).await.unwrap();
    assert_eq!(deleted, 5);
    assert_eq!(db.count_results(event_year_id).await.unwrap(), 0);
    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 0);

    assert_eq!(db.count_results(other_year_id).await.unwrap(), 5);
    assert_eq!(db.count_participants(other_year_id).await.unwrap(), 4);

    assert_eq!(db.delete_event_results(event_year_id).await.unwrap(), 0);
}

pub async fn delete_participants_respects_results(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    db.ingest_results(event_year_id, &five_reads()).await.unwrap();

    let err = db
        .delete_participants(event_year_id, &["4".to_string()])
        .await
        .unwrap_err();
    assert!(
        matches!(err, StorageError::ConstraintViolation(_)),
        "unexpected error: {err}"
    );
    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 4);

    db.delete_results(
        event_year_id,
        &[
            ResultKey::new("287", "Finish", 1),
            ResultKey::new("287", "Finish", 2),
        ],
    )
    .await
    .unwrap();
    let deleted = db
        .delete_participants(event_year_id, &["4".to_string(), "missing".to_string()])
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 3);

    db.delete_event_results(event_year_id).await.unwrap();
    db.ingest_results(event_year_id, &[row("1", "100", "Start", 1, 0)])
        .await
        .unwrap();
    db.delete_results(event_year_id, &[ResultKey::new("100", "Start", 1)])
        .await
        .unwrap();
    assert_eq!(db.delete_participants(event_year_id, &[]).await.unwrap(), 1);
    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 0);
}

pub async fn rankings_are_stored_as_given(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let mut ranked = row("3", "209", "Finish", 1, 1980);
    ranked.ranking = 1;
    ranked.age_ranking = 1;
    ranked.gender_ranking = 1;
    ranked.segment = Some("Bike".to_string());
    ranked.division = Some("Elite".to_string());
    ranked.division_ranking = 2;
    ranked.result_type = 3;
    ranked.milliseconds = 417;
    ranked.chip_seconds = 1975;
    ranked.chip_milliseconds = 88;
    ranked.anonymous = true;

    let stored = db.ingest_results(event_year_id, &[ranked.clone()]).await.unwrap();
    assert_eq!(stored, vec![ranked.clone()]);

    let read = db
        .get_result(event_year_id, &ResultKey::new("209", "Finish", 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read, ranked);
}

pub async fn invalid_batches_touch_nothing(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;

    let err = db.ingest_results(event_year_id, &[]).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));

    let mut bad = row("2", "106", "Finish", 1, 2250);
    bad.chip_milliseconds = 1500;
    let err = db
        .ingest_results(event_year_id, &[row("1", "100", "Finish", 1, 2100), bad])
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));

    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 0);
    assert_eq!(db.count_results(event_year_id).await.unwrap(), 0);
}

pub async fn identity_keys_are_case_sensitive(db: &Database, event_year_id: i64) {
    reset(db, event_year_id).await;
    let mut upper = row("A", "2", "Finish", 1, 1100);
    upper.distance = "10k".to_string();
    let batch = vec![
        row("a", "1", "Finish", 1, 1000),
        upper,
        row("a", "1", "finish", 1, 1200),
    ];
    db.ingest_results(event_year_id, &batch).await.unwrap();

    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 2);
    assert_eq!(db.count_results(event_year_id).await.unwrap(), 3);

    let lower = db.get_participant(event_year_id, "a").await.unwrap().unwrap();
    let upper = db.get_participant(event_year_id, "A").await.unwrap().unwrap();
    assert_ne!(lower.id, upper.id);
    assert_eq!(upper.bib, "2");

    let ten_k = db
        .get_distance(event_year_id, "10K", ResultView::All, Pagination::unpaged())
        .await
        .unwrap();
    assert_eq!(
        keys(&ten_k),
        vec![
            ("1".to_string(), "Finish".to_string(), 1),
            ("1".to_string(), "finish".to_string(), 1),
        ]
    );

    let err = db
        .ingest_results(event_year_id, &[row("a ", "1", "Finish", 1, 1000)])
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)));
    assert_eq!(db.count_participants(event_year_id).await.unwrap(), 2);
}
