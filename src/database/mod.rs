use mongodb::{Client, Collection, Database};
use std::error::Error;
use std::time::Duration;

pub const USERS_COLLECTION: &str = "users-collection";
pub const FAVORITES_COLLECTION: &str = "favorites-recipes-collection";
pub const SEARCH_HISTORY_COLLECTION: &str = "recipes-search-history-collection";
pub const VIEWED_COLLECTION: &str = "recipe-viewed-collection";

const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Connects with a fixed retry budget, then gives up. The connection is
    /// verified and per-user unique indexes are created before returning.
    pub async fn connect(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut last_error: Option<Box<dyn Error>> = None;

        for attempt in 1..=CONNECT_ATTEMPTS {
            log::info!(
                "Connecting to MongoDB... (attempt {}/{})",
                attempt,
                CONNECT_ATTEMPTS
            );

            match Self::try_connect(uri).await {
                Ok(mongodb) => return Ok(mongodb),
                Err(e) => {
                    log::error!("MongoDB connection attempt {} failed: {}", attempt, e);
                    last_error = Some(e);
                    if attempt < CONNECT_ATTEMPTS {
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| "MongoDB connection failed".into()))
    }

    async fn try_connect(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Database name comes from the URI path, e.g. .../recipe-finder-db
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("recipe-finder-db");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Each per-user collection is keyed by the Auth0 subject; a unique index
    /// keeps one document per user and makes the lookups fast.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        for name in [
            USERS_COLLECTION,
            FAVORITES_COLLECTION,
            SEARCH_HISTORY_COLLECTION,
            VIEWED_COLLECTION,
        ] {
            let collection = self.db.collection::<mongodb::bson::Document>(name);

            let index = IndexModel::builder()
                .keys(doc! { "auth0Id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();

            match collection.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(auth0Id)", name),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
