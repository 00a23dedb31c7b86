use async_trait::async_trait;
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, ReturnDocument, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::sync::Arc;
use std::time::Duration;

use crate::db::repository::BookingRepository;
use crate::error::BookingError;
use crate::models::bookings::{Booking, BookingRequest, BookingStatus};

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping failed: {}", e);
            log::warn!("Bookings may be unavailable until the server is reachable");
        }
    }

    Ok(Arc::new(client))
}

pub struct MongoBookingRepository {
    collection: Collection<Booking>,
}

impl MongoBookingRepository {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            collection: client.database(database).collection("Bookings"),
        }
    }

    async fn find_sorted(&self, filter: bson::Document) -> Result<Vec<Booking>, BookingError> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    async fn create(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let booking = Booking::from_request(request, Utc::now());
        self.collection.insert_one(&booking).await?;
        Ok(booking)
    }

    async fn get(&self, id: &str) -> Result<Option<Booking>, BookingError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, BookingError> {
        self.find_sorted(doc! { "user_id": user_id }).await
    }

    async fn list_all(&self) -> Result<Vec<Booking>, BookingError> {
        self.find_sorted(doc! {}).await
    }

    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingError> {
        let updated_at =
            bson::to_bson(&Utc::now()).map_err(|e| BookingError::Repository(e.to_string()))?;
        let update = doc! {
            "$set": {
                "status": status.as_str(),
                "updated_at": updated_at,
            }
        };

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id, "status": expected.as_str() }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }
}
