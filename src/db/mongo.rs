use std::collections::HashSet;

use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{ClientOptions, FindOptions, ServerApi, ServerApiVersion};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use mongodb::{Client, Collection, Cursor};
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;

use super::query;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database operation failed: {0}")]
    Operation(#[from] mongodb::error::Error),
}

struct Handles {
    client: Client,
    movies: Collection<Document>,
    watchlist: Collection<Document>,
}

/// Lazily-connected repository over the two catalog collections.
///
/// The connection is established at most once per process; concurrent first
/// callers are serialized by the `OnceCell`. If establishment fails, the cell
/// stays empty, the error surfaces to the current request, and the next
/// request triggers a fresh attempt.
pub struct MongoRepository {
    config: DatabaseConfig,
    handles: OnceCell<Handles>,
}

impl MongoRepository {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            handles: OnceCell::new(),
        }
    }

    async fn connect(&self) -> DbResult<Handles> {
        let mut options = ClientOptions::parse(self.config.connection_uri()).await?;
        options.app_name = Some("movieshelf".to_string());
        options.max_pool_size = Some(self.config.max_pool_size);
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .build(),
        );

        let client = Client::with_options(options)?;

        // Surface connectivity problems here rather than on the first
        // collection call.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;

        let db = client.database(&self.config.database);
        let movies = db.collection(&self.config.movies_collection);
        let watchlist = db.collection(&self.config.watchlist_collection);

        info!(database = %self.config.database, "connected to MongoDB");

        Ok(Handles {
            client,
            movies,
            watchlist,
        })
    }

    async fn handles(&self) -> DbResult<&Handles> {
        self.handles.get_or_try_init(|| self.connect()).await
    }

    pub async fn ping(&self) -> DbResult<()> {
        let handles = self.handles().await?;
        handles
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    pub async fn list_movies(&self, filter: Document) -> DbResult<Vec<Document>> {
        let handles = self.handles().await?;
        collect(handles.movies.find(filter, None).await?).await
    }

    pub async fn top_rated(&self) -> DbResult<Vec<Document>> {
        let handles = self.handles().await?;
        let options = FindOptions::builder()
            .sort(query::sort_by_rating_desc())
            .limit(query::TOP_RATED_LIMIT)
            .build();
        collect(handles.movies.find(None, options).await?).await
    }

    pub async fn latest(&self) -> DbResult<Vec<Document>> {
        let handles = self.handles().await?;
        let options = FindOptions::builder()
            .sort(query::sort_by_created_desc())
            .limit(query::LATEST_LIMIT)
            .build();
        collect(handles.movies.find(None, options).await?).await
    }

    pub async fn movie_by_id(&self, id: &ObjectId) -> DbResult<Option<Document>> {
        let handles = self.handles().await?;
        Ok(handles.movies.find_one(query::id_filter(id), None).await?)
    }

    pub async fn insert_movie(&self, movie: Document) -> DbResult<InsertOneResult> {
        let handles = self.handles().await?;
        Ok(handles.movies.insert_one(movie, None).await?)
    }

    /// Partial update: the submitted fields are merged over the stored
    /// document, everything else is left untouched.
    pub async fn update_movie(&self, id: &ObjectId, fields: Document) -> DbResult<UpdateResult> {
        let handles = self.handles().await?;
        let update = doc! { "$set": fields };
        Ok(handles
            .movies
            .update_one(query::id_filter(id), update, None)
            .await?)
    }

    pub async fn delete_movie(&self, id: &ObjectId) -> DbResult<DeleteResult> {
        let handles = self.handles().await?;
        Ok(handles.movies.delete_one(query::id_filter(id), None).await?)
    }

    pub async fn filter_movies(
        &self,
        filter: Document,
        sort: Option<Document>,
    ) -> DbResult<Vec<Document>> {
        let handles = self.handles().await?;
        let options = FindOptions::builder()
            .sort(sort)
            .projection(query::filter_projection())
            .build();
        collect(handles.movies.find(filter, options).await?).await
    }

    /// Distinct genre values across the whole catalog. Projects the genre
    /// field only and dedups client-side; set semantics, sorted for stable
    /// output.
    pub async fn genres(&self) -> DbResult<Vec<String>> {
        let handles = self.handles().await?;
        let options = FindOptions::builder()
            .projection(doc! { "genre": 1, "_id": 0 })
            .build();
        let docs = collect(handles.movies.find(None, options).await?).await?;

        let mut genres = HashSet::new();
        for doc in &docs {
            if let Ok(genre) = doc.get_str("genre") {
                genres.insert(genre.to_string());
            }
        }

        let mut genres: Vec<String> = genres.into_iter().collect();
        genres.sort();
        Ok(genres)
    }

    pub async fn insert_watchlist_entry(&self, entry: Document) -> DbResult<InsertOneResult> {
        let handles = self.handles().await?;
        Ok(handles.watchlist.insert_one(entry, None).await?)
    }

    pub async fn watchlist_entries(&self, filter: Document) -> DbResult<Vec<Document>> {
        let handles = self.handles().await?;
        collect(handles.watchlist.find(filter, None).await?).await
    }

    pub async fn delete_watchlist_entry(&self, id: &ObjectId) -> DbResult<DeleteResult> {
        let handles = self.handles().await?;
        Ok(handles
            .watchlist
            .delete_one(query::id_filter(id), None)
            .await?)
    }
}

async fn collect(cursor: Cursor<Document>) -> DbResult<Vec<Document>> {
    Ok(cursor.try_collect().await?)
}
