use serde::de::DeserializeOwned;
use snafu::{Location, ResultExt, Snafu};
use surrealdb::opt::QueryResult;

use super::{Database, Record, Table, Thing};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DatabaseQueryError {
    #[snafu(display("failed to send the query at {location}: {source}"))]
    MalformedQuery {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("query was rejected by the database: {source}"))]
    Statement {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to deserialize the database response at {location}: {source}"))]
    Deserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("expected a result from the database, but got none"))]
    NoResults {
        #[snafu(implicit)]
        location: Location,
    },
}

impl Database {
    /// Create a builder to execute arbitrary SurrealQL on the database.
    /// Parameters are bound with [Bindings::bind] which takes any serializable `(name, value)` pair.
    ///
    /// # Example
    /// ```ignore
    /// let comments: Vec<Comment> = database
    ///     .sql("SELECT * FROM comments WHERE video = $video")
    ///     .bind(("video", video_id))
    ///     .fetch_first()
    ///     .await?;
    /// ```
    pub fn sql(&self, query: &str) -> Bindings<'_> {
        Bindings {
            query: self.query(query.to_owned()),
        }
    }
}

#[derive(Debug)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, surrealdb::engine::any::Any>,
}

impl Bindings<'_> {
    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        let query = self.query;
        self.query = query.bind(params);
        self
    }

    /// Execute the query and return the raw [surrealdb::Response].
    /// Fails if any of the statements was rejected, e.g. by a unique index.
    pub async fn execute(self) -> Result<surrealdb::Response, DatabaseQueryError> {
        let response = self.query.await.context(MalformedQuerySnafu)?;
        let response = response.check().context(StatementSnafu)?;
        tracing::debug!(?response, "executed query");
        Ok(response)
    }

    /// Execute the query and return the first statement's result as a deserialized value.
    pub async fn fetch_first<T: DeserializeOwned>(self) -> Result<T, DatabaseQueryError>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        statements.take::<T>(0).context(DeserializeSnafu)
    }

    /// Like [Bindings::fetch_first] but the statement must produce a row.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, DatabaseQueryError>
    where
        usize: QueryResult<Option<T>>,
    {
        self.fetch_first::<Option<T>>()
            .await?
            .ok_or_else(|| NoResultsSnafu.build())
    }
}

impl Database {
    /// Whether the record exists, without loading its content.
    pub async fn exists<T: Table>(&self, id: &Record<T>) -> Result<bool, DatabaseQueryError> {
        let found: Option<Thing> = self
            .sql("SELECT VALUE id FROM $id")
            .bind(("id", id))
            .fetch_first()
            .await?;
        Ok(found.is_some())
    }

    /// Create the row under its own id and return what was stored.
    pub async fn insert<T>(&self, row: &T) -> Result<T, DatabaseQueryError>
    where
        T: Table + serde::Serialize + DeserializeOwned,
    {
        tracing::debug!(id = %row.id(), "inserting row");
        self.sql("CREATE $id CONTENT $content")
            .bind(("id", row.id()))
            .bind(("content", row))
            .fetch_one()
            .await
    }
}
