use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use crate::models::analytics::{AnalyticsEvent, FunnelStep, Insights, PeriodCounts};

pub const DEFAULT_BUFFER_SIZE: usize = 1000;
pub const RECENT_LIMIT: usize = 50;

/// Keeps the most recent events in a bounded buffer.
pub struct AnalyticsTracker {
    events: RwLock<VecDeque<AnalyticsEvent>>,
    capacity: usize,
    next_id: AtomicU64,
}

impl Default for AnalyticsTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl AnalyticsTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_BUFFER_SIZE))),
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_env() -> Self {
        let capacity = std::env::var("ANALYTICS_BUFFER_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_BUFFER_SIZE);
        Self::new(capacity)
    }

    pub async fn track_event_at(
        &self,
        name: &str,
        user_id: Option<&str>,
        properties: Map<String, Value>,
        timestamp: DateTime<Utc>,
    ) -> u64 {
        let event = AnalyticsEvent {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            user_id: user_id.map(String::from),
            timestamp,
            properties,
        };
        let id = event.id;
        log::debug!("Analytics event: {} {:?}", event.name, event.properties);

        let mut events = self.events.write().await;
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
        id
    }

    pub async fn track_event(
        &self,
        name: &str,
        user_id: Option<&str>,
        properties: Map<String, Value>,
    ) -> u64 {
        self.track_event_at(name, user_id, properties, Utc::now())
            .await
    }

    pub async fn track_page_view(&self, page: &str, user_id: Option<&str>) -> u64 {
        self.track_event("page_view", user_id, props(json!({ "page": page })))
            .await
    }

    pub async fn track_booking_funnel(
        &self,
        step: FunnelStep,
        user_id: Option<&str>,
        mut extra: Map<String, Value>,
    ) -> u64 {
        extra.insert("step".to_string(), json!(step.as_str()));
        extra.insert("step_name".to_string(), json!(step.label()));
        self.track_event("booking_funnel", user_id, extra).await
    }

    pub async fn track_search(
        &self,
        query: &str,
        results: usize,
        filters: Value,
        user_id: Option<&str>,
    ) -> u64 {
        let properties = props(json!({
            "query": query,
            "results_count": results,
            "filters": filters,
            "has_results": results > 0,
        }));
        self.track_event("search", user_id, properties).await
    }

    pub async fn track_engagement(
        &self,
        action: &str,
        user_id: Option<&str>,
        mut extra: Map<String, Value>,
    ) -> u64 {
        extra.insert("action".to_string(), json!(action));
        self.track_event("engagement", user_id, extra).await
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    pub async fn recent(&self, limit: usize) -> Vec<AnalyticsEvent> {
        let events = self.events.read().await;
        events.iter().rev().take(limit).cloned().collect()
    }

    /// Counts since UTC midnight, over the last seven days, and since the first of the month
    pub async fn insights(&self, now: DateTime<Utc>) -> Insights {
        let today = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
        let week = today - Duration::days(7);
        let month = Utc.from_utc_datetime(
            &now.date_naive()
                .with_day(1)
                .unwrap_or(now.date_naive())
                .and_time(NaiveTime::MIN),
        );

        let events = self.events.read().await;
        let count = |since: DateTime<Utc>| {
            let mut counts = PeriodCounts::default();
            for event in events.iter().filter(|e| e.timestamp >= since) {
                match event.name.as_str() {
                    "page_view" => counts.page_views += 1,
                    "search" => counts.searches += 1,
                    "booking_funnel"
                        if event.properties.get("step")
                            == Some(&json!(FunnelStep::BookingComplete.as_str())) =>
                    {
                        counts.bookings += 1
                    }
                    _ => {}
                }
            }
            counts
        };

        Insights {
            today: count(today),
            week: count(week),
            month: count(month),
        }
    }
}

fn props(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
