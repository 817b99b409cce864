use tracing::debug;

use super::timed;
use crate::Database;
use crate::dto::{Pagination, ResultKey, ResultPage, ResultQuery, ResultView};
use crate::error::{Result, StorageError};
use crate::models::{Person, TimingRow};

impl Database {
    /// Runs any view/filter/paging combination over one event-year.
    pub async fn get_results(
        &self,
        event_year_id: i64,
        query: &ResultQuery,
    ) -> Result<Vec<TimingRow>> {
        query.validate().map_err(StorageError::Validation)?;

        let rows = timed(
            "get results",
            self.timeouts.operation,
            self.store.get_results(event_year_id, query),
        )
        .await?;

        debug!(
            "{} view for event year {} (distance {:?}, bib {:?}): {} row(s)",
            query.view.as_str(),
            event_year_id,
            query.distance,
            query.bib,
            rows.len()
        );

        Ok(rows)
    }

    /// Like [`Database::get_results`], with the paging echoed back.
    pub async fn get_results_page(
        &self,
        event_year_id: i64,
        query: &ResultQuery,
    ) -> Result<ResultPage<TimingRow>> {
        let rows = self.get_results(event_year_id, query).await?;
        Ok(ResultPage::new(rows, query.pagination))
    }

    pub async fn get_all(
        &self,
        event_year_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<TimingRow>> {
        let query = ResultQuery {
            pagination,
            ..ResultQuery::all()
        };
        self.get_results(event_year_id, &query).await
    }

    pub async fn get_finish(
        &self,
        event_year_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<TimingRow>> {
        let query = ResultQuery {
            pagination,
            ..ResultQuery::finish()
        };
        self.get_results(event_year_id, &query).await
    }

    pub async fn get_last(
        &self,
        event_year_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<TimingRow>> {
        let query = ResultQuery {
            pagination,
            ..ResultQuery::last()
        };
        self.get_results(event_year_id, &query).await
    }

    /// Distance-filtered view; `view` chooses every read or one per
    /// participant.
    pub async fn get_distance(
        &self,
        event_year_id: i64,
        distance: &str,
        view: ResultView,
        pagination: Pagination,
    ) -> Result<Vec<TimingRow>> {
        let query = ResultQuery {
            pagination,
            ..ResultQuery::view(view).with_distance(distance)
        };
        self.get_results(event_year_id, &query).await
    }

    /// A participant's full history by bib, unfiltered and unpaged.
    pub async fn get_bib_results(&self, event_year_id: i64, bib: &str) -> Result<Vec<TimingRow>> {
        timed(
            "get bib results",
            self.timeouts.operation,
            self.store.get_bib_results(event_year_id, bib),
        )
        .await
    }

    /// One read, or `None` when nothing matches.
    pub async fn get_result(
        &self,
        event_year_id: i64,
        key: &ResultKey,
    ) -> Result<Option<TimingRow>> {
        timed(
            "get result",
            self.timeouts.operation,
            self.store.get_result(event_year_id, key),
        )
        .await
    }

    pub async fn get_participant(
        &self,
        event_year_id: i64,
        stable_id: &str,
    ) -> Result<Option<Person>> {
        timed(
            "get participant",
            self.timeouts.operation,
            self.store.get_participant(event_year_id, stable_id),
        )
        .await
    }

    pub async fn get_participants(&self, event_year_id: i64) -> Result<Vec<Person>> {
        timed(
            "get participants",
            self.timeouts.operation,
            self.store.get_participants(event_year_id),
        )
        .await
    }

    pub async fn count_results(&self, event_year_id: i64) -> Result<i64> {
        timed(
            "count results",
            self.timeouts.operation,
            self.store.count_results(event_year_id),
        )
        .await
    }

    pub async fn count_participants(&self, event_year_id: i64) -> Result<i64> {
        timed(
            "count participants",
            self.timeouts.operation,
            self.store.count_participants(event_year_id),
        )
        .await
    }
}
