//! Demo catalogue and accounts used when no external store is configured.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{
    account::{User, UserRole},
    property::{Property, PropertyType, Review, Room},
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn room(id: u32, name: &str, price: i64, max_guests: u32, amenities: &[&str]) -> Room {
    Room {
        id,
        name: name.to_string(),
        price_per_night: Decimal::from(price),
        max_guests,
        amenities: strings(amenities),
    }
}

fn review(id: u32, user_name: &str, rating: u8, comment: &str, date: (i32, u32, u32)) -> Review {
    Review {
        id,
        user_name: user_name.to_string(),
        rating,
        comment: comment.to_string(),
        created_at: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap_or_default(),
    }
}

pub fn properties() -> Vec<Property> {
    vec![
        Property {
            id: 1,
            name: "Grand Palace Hotel".to_string(),
            city: "New York".to_string(),
            country: "USA".to_string(),
            address: "123 Broadway, New York, NY".to_string(),
            property_type: PropertyType::Hotel,
            description: "Luxury hotel in the heart of Manhattan with stunning city views and world-class amenities.".to_string(),
            images: strings(&[
                "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=800",
                "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=800",
            ]),
            amenities: strings(&["WiFi", "Pool", "Gym", "Restaurant", "Room Service", "Parking"]),
            rooms: vec![
                room(1, "Deluxe Room", 299, 2, &["WiFi", "TV", "Air Conditioning", "Mini Bar"]),
                room(2, "Executive Suite", 499, 4, &["WiFi", "TV", "Air Conditioning", "Mini Bar", "Living Area", "City View"]),
            ],
            reviews: vec![
                review(1, "John Doe", 5, "Excellent service and beautiful rooms!", (2024, 1, 15)),
                review(4, "Priya Patel", 4, "Great location, a little noisy at night.", (2024, 1, 20)),
            ],
        },
        Property {
            id: 2,
            name: "Seaside Resort".to_string(),
            city: "Miami".to_string(),
            country: "USA".to_string(),
            address: "456 Ocean Drive, Miami, FL".to_string(),
            property_type: PropertyType::Resort,
            description: "Beachfront resort with private beach access and tropical paradise vibes.".to_string(),
            images: strings(&[
                "https://images.unsplash.com/photo-1571896349842-33c89424de2d?w=800",
                "https://images.unsplash.com/photo-1520250497591-112f2f40a3f4?w=800",
            ]),
            amenities: strings(&["WiFi", "Beach Access", "Pool", "Spa", "Restaurant", "Bar"]),
            rooms: vec![
                room(3, "Ocean View Room", 189, 2, &["WiFi", "TV", "Ocean View", "Balcony"]),
                room(4, "Beach Villa", 399, 6, &["WiFi", "TV", "Private Beach", "Kitchen", "Living Area"]),
            ],
            reviews: vec![
                review(2, "Sarah Smith", 5, "Perfect beach vacation spot!", (2024, 1, 10)),
            ],
        },
        Property {
            id: 3,
            name: "Mountain Lodge".to_string(),
            city: "Aspen".to_string(),
            country: "USA".to_string(),
            address: "789 Mountain View Rd, Aspen, CO".to_string(),
            property_type: PropertyType::Lodge,
            description: "Cozy mountain lodge perfect for skiing and outdoor adventures.".to_string(),
            images: strings(&[
                "https://images.unsplash.com/photo-1518780664697-55e3ad937233?w=800",
            ]),
            amenities: strings(&["WiFi", "Fireplace", "Ski Storage", "Restaurant", "Hot Tub"]),
            rooms: vec![
                room(5, "Standard Room", 159, 2, &["WiFi", "Fireplace", "Mountain View"]),
                room(6, "Family Cabin", 259, 4, &["WiFi", "Fireplace", "Kitchen", "Living Area"]),
            ],
            reviews: vec![
                review(3, "Mike Johnson", 4, "Great location for skiing!", (2024, 1, 5)),
            ],
        },
    ]
}

pub fn users() -> Vec<User> {
    let joined = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let user = |id: &str, email: &str, first: &str, last: &str, role: UserRole| User {
        id: id.to_string(),
        email: email.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        role,
        created_at: joined,
    };

    vec![
        user("u-admin", "admin@staybook.dev", "Alex", "Rivera", UserRole::Admin),
        user("u-manager", "manager@staybook.dev", "Morgan", "Lee", UserRole::Manager),
        user("u-staff", "staff@staybook.dev", "Sam", "Okafor", UserRole::Staff),
        user("u-1001", "john@example.com", "John", "Doe", UserRole::User),
        user("u-1002", "sarah@example.com", "Sarah", "Smith", UserRole::User),
    ]
}
