//! [`ResultStore`](super::ResultStore) method bodies shared by both backends.
//!
//! The statements are the same on MySQL and SQLite; only the pool, the
//! argument types and a few per-backend hooks differ. The expanding module
//! must define:
//!
//! - `MIGRATOR`: the backend's embedded migrations;
//! - `reported_person_id(&QueryResult) -> Option<i64>`: the id the driver
//!   reports for a person upsert, when it can be trusted.

macro_rules! impl_result_store {
    ($store:ty, $db:ty, $dialect:expr) => {
        use $crate::error::QueryContext as _;

        #[async_trait::async_trait]
        impl $crate::repository::ResultStore for $store {
            fn dialect(&self) -> $crate::repository::Dialect {
                $dialect
            }

            async fn run_migrations(&self) -> $crate::error::Result<()> {
                MIGRATOR.run(&self.pool).await?;
                Ok(())
            }

            async fn health_check(&self) -> $crate::error::Result<()> {
                sqlx::query("SELECT 1").execute(&self.pool).await?;
                Ok(())
            }

            async fn ingest_results(
                &self,
                event_year_id: i64,
                rows: &[$crate::models::TimingRow],
            ) -> $crate::error::Result<Vec<$crate::models::TimingRow>> {
                use $crate::repository::sql;

                let event = || format!("event year {}", event_year_id);

                let mut tx = self.pool.begin().await.context("begin ingestion", event)?;

                let existing = sqlx::query_as::<_, (String, i64)>(sql::SELECT_PERSON_IDS)
                    .bind(event_year_id)
                    .fetch_all(&mut *tx)
                    .await
                    .context("prefetch person ids", event)?;
                let mut person_ids = $crate::repository::person_ids::PersonIdMap::new(existing);
                tracing::debug!(
                    "Pre-fetched {} participant(s) for event year {}",
                    person_ids.len(),
                    event_year_id
                );

                let upsert_person = sql::upsert_person($dialect);
                let upsert_result = sql::upsert_result($dialect);

                for (idx, row) in rows.iter().enumerate() {
                    let row_context = || format!("row {} ({})", idx, row.label());

                    let done = sqlx::query(&upsert_person)
                        .bind(event_year_id)
                        .bind(&row.stable_id)
                        .bind(&row.bib)
                        .bind(&row.first_name)
                        .bind(&row.last_name)
                        .bind(&row.birthdate)
                        .bind(row.age)
                        .bind(&row.gender)
                        .bind(&row.age_group)
                        .bind(&row.distance)
                        .bind(row.anonymous)
                        .execute(&mut *tx)
                        .await
                        .context("upsert person", row_context)?;

                    let person_id = match person_ids.get(&row.stable_id) {
                        Some(id) => id,
                        None => {
                            let id = match reported_person_id(&done) {
                                Some(id) => id,
                                None => sqlx::query_scalar::<_, i64>(sql::SELECT_PERSON_ID)
                                    .bind(event_year_id)
                                    .bind(&row.stable_id)
                                    .fetch_optional(&mut *tx)
                                    .await
                                    .context("resolve person id", row_context)?
                                    .ok_or_else(|| {
                                        $crate::error::StorageError::Integrity(format!(
                                            "no person id for {}",
                                            row_context()
                                        ))
                                    })?,
                            };
                            person_ids.record(&row.stable_id, id);
                            id
                        }
                    };

                    sqlx::query(&upsert_result)
                        .bind(person_id)
                        .bind(&row.location)
                        .bind(row.occurrence)
                        .bind(row.seconds)
                        .bind(row.milliseconds)
                        .bind(row.chip_seconds)
                        .bind(row.chip_milliseconds)
                        .bind(&row.segment)
                        .bind(row.ranking)
                        .bind(row.age_ranking)
                        .bind(row.gender_ranking)
                        .bind(row.finish)
                        .bind(row.result_type)
                        .bind(&row.division)
                        .bind(row.division_ranking)
                        .execute(&mut *tx)
                        .await
                        .context("upsert result", row_context)?;
                }

                tx.commit().await.context("commit ingestion", event)?;

                Ok(rows.to_vec())
            }

            async fn get_results(
                &self,
                event_year_id: i64,
                query: &$crate::dto::ResultQuery,
            ) -> $crate::error::Result<Vec<$crate::models::TimingRow>> {
                let mut builder = sqlx::QueryBuilder::<$db>::new("");
                $crate::repository::sql::push_select_results(&mut builder, event_year_id, query);

                let rows = builder
                    .build_query_as::<$crate::models::TimingRow>()
                    .fetch_all(&self.pool)
                    .await
                    .context("select results", || {
                        format!("event year {}, {} view", event_year_id, query.view.as_str())
                    })?;

                Ok(rows)
            }

            async fn get_bib_results(
                &self,
                event_year_id: i64,
                bib: &str,
            ) -> $crate::error::Result<Vec<$crate::models::TimingRow>> {
                let rows = sqlx::query_as::<_, $crate::models::TimingRow>(
                    &$crate::repository::sql::select_bib_results(),
                )
                .bind(event_year_id)
                .bind(bib)
                .fetch_all(&self.pool)
                .await
                .context("select bib results", || {
                    format!("event year {}, bib {}", event_year_id, bib)
                })?;

                Ok(rows)
            }

            async fn get_result(
                &self,
                event_year_id: i64,
                key: &$crate::dto::ResultKey,
            ) -> $crate::error::Result<Option<$crate::models::TimingRow>> {
                let row = sqlx::query_as::<_, $crate::models::TimingRow>(
                    &$crate::repository::sql::select_result(),
                )
                .bind(event_year_id)
                .bind(&key.bib)
                .bind(&key.location)
                .bind(key.occurrence)
                .fetch_optional(&self.pool)
                .await
                .context("select result", || {
                    format!("event year {}, {}", event_year_id, key)
                })?;

                Ok(row)
            }

            async fn get_participant(
                &self,
                event_year_id: i64,
                stable_id: &str,
            ) -> $crate::error::Result<Option<$crate::models::Person>> {
                let person = sqlx::query_as::<_, $crate::models::Person>(
                    &$crate::repository::sql::select_person(),
                )
                .bind(event_year_id)
                .bind(stable_id)
                .fetch_optional(&self.pool)
                .await
                .context("select participant", || {
                    format!("event year {}, stable id {}", event_year_id, stable_id)
                })?;

                Ok(person)
            }

            async fn get_participants(
                &self,
                event_year_id: i64,
            ) -> $crate::error::Result<Vec<$crate::models::Person>> {
                let persons = sqlx::query_as::<_, $crate::models::Person>(
                    &$crate::repository::sql::select_persons(),
                )
                .bind(event_year_id)
                .fetch_all(&self.pool)
                .await
                .context("select participants", || format!("event year {}", event_year_id))?;

                Ok(persons)
            }

            async fn count_results(&self, event_year_id: i64) -> $crate::error::Result<i64> {
                let count = sqlx::query_scalar::<_, i64>($crate::repository::sql::COUNT_RESULTS)
                    .bind(event_year_id)
                    .fetch_one(&self.pool)
                    .await
                    .context("count results", || format!("event year {}", event_year_id))?;

                Ok(count)
            }

            async fn count_participants(&self, event_year_id: i64) -> $crate::error::Result<i64> {
                let count = sqlx::query_scalar::<_, i64>($crate::repository::sql::COUNT_PERSONS)
                    .bind(event_year_id)
                    .fetch_one(&self.pool)
                    .await
                    .context("count participants", || format!("event year {}", event_year_id))?;

                Ok(count)
            }

            async fn delete_results(
                &self,
                event_year_id: i64,
                keys: &[$crate::dto::ResultKey],
            ) -> $crate::error::Result<u64> {
                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .context("begin result deletion", || format!("event year {}", event_year_id))?;

                // Same statement text every iteration, so the connection's
                // statement cache prepares it once.
                let mut deleted = 0;
                for key in keys {
                    let done = sqlx::query($crate::repository::sql::DELETE_RESULT)
                        .bind(&key.location)
                        .bind(key.occurrence)
                        .bind(event_year_id)
                        .bind(&key.bib)
                        .execute(&mut *tx)
                        .await
                        .context("delete result", || {
                            format!("event year {}, {}", event_year_id, key)
                        })?;
                    deleted += done.rows_affected();
                }

                tx.commit()
                    .await
                    .context("commit result deletion", || format!("event year {}", event_year_id))?;

                Ok(deleted)
            }

            async fn delete_event_results(&self, event_year_id: i64) -> $crate::error::Result<u64> {
                use $crate::repository::sql;

                let event = || format!("event year {}", event_year_id);

                let mut tx = self.pool.begin().await.context("begin event purge", event)?;

                let results = sqlx::query(sql::DELETE_EVENT_RESULTS)
                    .bind(event_year_id)
                    .execute(&mut *tx)
                    .await
                    .context("delete event results", event)?
                    .rows_affected();

                let persons = sqlx::query(sql::DELETE_ORPHANED_PERSONS)
                    .bind(event_year_id)
                    .execute(&mut *tx)
                    .await
                    .context("delete orphaned participants", event)?
                    .rows_affected();

                tx.commit().await.context("commit event purge", event)?;

                tracing::info!(
                    "Purged event year {}: {} result(s), {} participant(s)",
                    event_year_id,
                    results,
                    persons
                );

                Ok(results)
            }

            async fn delete_participants(
                &self,
                event_year_id: i64,
                stable_ids: &[String],
            ) -> $crate::error::Result<u64> {
                use $crate::repository::sql;

                let event = || format!("event year {}", event_year_id);

                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .context("begin participant deletion", event)?;

                let deleted = if stable_ids.is_empty() {
                    sqlx::query(sql::DELETE_EVENT_PERSONS)
                        .bind(event_year_id)
                        .execute(&mut *tx)
                        .await
                        .context("delete participants", event)?
                        .rows_affected()
                } else {
                    let mut deleted = 0;
                    for stable_id in stable_ids {
                        deleted += sqlx::query(sql::DELETE_PERSON)
                            .bind(event_year_id)
                            .bind(stable_id)
                            .execute(&mut *tx)
                            .await
                            .context("delete participant", || {
                                format!("event year {}, stable id {}", event_year_id, stable_id)
                            })?
                            .rows_affected();
                    }
                    deleted
                };

                tx.commit()
                    .await
                    .context("commit participant deletion", event)?;

                Ok(deleted)
            }
        }
    };
}

pub(crate) use impl_result_store;
