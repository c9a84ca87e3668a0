//! Pure filter/sort/projection construction. No I/O happens here; every
//! function maps request parameters to the documents handed to the driver.

use mongodb::bson::{doc, oid::ObjectId, Document};

pub const TOP_RATED_LIMIT: i64 = 5;
pub const LATEST_LIMIT: i64 = 6;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid identifier {0:?}: expected a 24-character hex string")]
    InvalidIdentifier(String),
}

/// Parse a path identifier before it gets anywhere near the database.
pub fn parse_id(raw: &str) -> Result<ObjectId, QueryError> {
    ObjectId::parse_str(raw).map_err(|_| QueryError::InvalidIdentifier(raw.to_string()))
}

pub fn id_filter(id: &ObjectId) -> Document {
    doc! { "_id": id }
}

/// Equality filter on a single field, or match-everything when the parameter
/// is absent. Shared by my-collection (addedBy) and watchlist (email).
pub fn owner_filter(field: &str, value: Option<&str>) -> Document {
    let mut filter = Document::new();
    if let Some(value) = value {
        filter.insert(field, value);
    }
    filter
}

/// Comma-separated genre list to a set-membership filter.
pub fn genre_filter(genres: Option<&str>) -> Document {
    let names: Vec<&str> = genres
        .unwrap_or("")
        .split(',')
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        Document::new()
    } else {
        doc! { "genre": { "$in": names } }
    }
}

/// Rating range plus the inferred sort direction. min-only sorts ascending,
/// max-only sorts descending, both bounds leave the order unspecified. That
/// pairing is intentional product behavior; keep it.
pub fn rating_filter(min: Option<&str>, max: Option<&str>) -> (Document, Option<Document>) {
    let min = min.and_then(|s| s.parse::<f64>().ok());
    let max = max.and_then(|s| s.parse::<f64>().ok());

    match (min, max) {
        (Some(min), Some(max)) => (doc! { "rating": { "$gte": min, "$lte": max } }, None),
        (Some(min), None) => (doc! { "rating": { "$gte": min } }, Some(doc! { "rating": 1 })),
        (None, Some(max)) => (doc! { "rating": { "$lte": max } }, Some(doc! { "rating": -1 })),
        (None, None) => (Document::new(), None),
    }
}

/// Combined filter for GET /movies/filter: genre membership and rating range
/// touch disjoint fields, so a plain merge is enough.
pub fn catalog_filter(
    genres: Option<&str>,
    min_rating: Option<&str>,
    max_rating: Option<&str>,
) -> (Document, Option<Document>) {
    let mut filter = genre_filter(genres);
    let (rating, sort) = rating_filter(min_rating, max_rating);
    filter.extend(rating);
    (filter, sort)
}

/// The filter endpoint returns a trimmed view of each movie.
pub fn filter_projection() -> Document {
    doc! { "title": 1, "rating": 1, "posterUrl": 1, "genre": 1, "releaseYear": 1 }
}

pub fn sort_by_rating_desc() -> Document {
    doc! { "rating": -1 }
}

pub fn sort_by_created_desc() -> Document {
    doc! { "createdAt": -1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = parse_id("65f2a77e9d1c4b0012345678").unwrap();
        assert_eq!(id.to_hex(), "65f2a77e9d1c4b0012345678");

        assert!(parse_id("").is_err());
        assert!(parse_id("1234").is_err());
        assert!(parse_id("65f2a77e9d1c4b001234567g").is_err());
        assert!(parse_id("65f2a77e9d1c4b00123456789").is_err());
    }

    #[test]
    fn test_owner_filter() {
        assert!(owner_filter("addedBy", None).is_empty());
        assert_eq!(
            owner_filter("email", Some("a@b.c")),
            doc! { "email": "a@b.c" }
        );
    }

    #[test]
    fn test_genre_filter() {
        assert!(genre_filter(None).is_empty());
        assert!(genre_filter(Some("")).is_empty());
        assert_eq!(
            genre_filter(Some("Action,Drama")),
            doc! { "genre": { "$in": ["Action", "Drama"] } }
        );
        // stray commas don't produce empty set members
        assert_eq!(
            genre_filter(Some(",Horror,")),
            doc! { "genre": { "$in": ["Horror"] } }
        );
    }

    #[test]
    fn test_genre_filter_splits_on_commas_only() {
        // names are not trimmed; a space after the comma is part of the name
        assert_eq!(
            genre_filter(Some("Action, Drama")),
            doc! { "genre": { "$in": ["Action", " Drama"] } }
        );
    }

    #[test]
    fn test_fixed_limits_and_sorts() {
        assert_eq!(TOP_RATED_LIMIT, 5);
        assert_eq!(LATEST_LIMIT, 6);
        assert_eq!(sort_by_rating_desc(), doc! { "rating": -1 });
        assert_eq!(sort_by_created_desc(), doc! { "createdAt": -1 });
    }

    #[test]
    fn test_filter_projection_fields() {
        let projection = filter_projection();
        let fields: Vec<&str> = projection.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            fields,
            vec!["title", "rating", "posterUrl", "genre", "releaseYear"]
        );
        // _id stays included so filtered results still round-trip into :id paths
        assert!(!projection.contains_key("_id"));
    }

    #[test]
    fn test_rating_filter_pairing() {
        let (filter, sort) = rating_filter(Some("3"), None);
        assert_eq!(filter, doc! { "rating": { "$gte": 3.0 } });
        assert_eq!(sort, Some(doc! { "rating": 1 }));

        let (filter, sort) = rating_filter(None, Some("8"));
        assert_eq!(filter, doc! { "rating": { "$lte": 8.0 } });
        assert_eq!(sort, Some(doc! { "rating": -1 }));

        let (filter, sort) = rating_filter(Some("3"), Some("8"));
        assert_eq!(filter, doc! { "rating": { "$gte": 3.0, "$lte": 8.0 } });
        assert!(sort.is_none());

        let (filter, sort) = rating_filter(None, None);
        assert!(filter.is_empty());
        assert!(sort.is_none());
    }

    #[test]
    fn test_rating_filter_ignores_garbage() {
        let (filter, sort) = rating_filter(Some("not-a-number"), None);
        assert!(filter.is_empty());
        assert!(sort.is_none());
    }

    #[test]
    fn test_catalog_filter_merges() {
        let (filter, sort) = catalog_filter(Some("Action"), Some("6.5"), None);
        assert_eq!(
            filter,
            doc! {
                "genre": { "$in": ["Action"] },
                "rating": { "$gte": 6.5 },
            }
        );
        assert_eq!(sort, Some(doc! { "rating": 1 }));
    }
}
