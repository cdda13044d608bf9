use realty_core::db::open_db_in_memory;
use realty_core::{
    BuyerContact, CallerIdentity, CreateListingParams, ErrorKind, InquiryService, ListingService,
    NewPerson, PersonRepository, PropertyType, ServiceError, SqliteInquiryRepository,
    SqliteListingRepository, SqlitePersonRepository,
};
use rusqlite::Connection;

fn seed_person(conn: &Connection, name: &str) -> CallerIdentity {
    let person = SqlitePersonRepository::try_new(conn)
        .unwrap()
        .create_person(&NewPerson {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555 555 5555".to_string(),
        })
        .unwrap();
    CallerIdentity::new(person.id, &person.name, 1, 2)
}

fn seed_listing(conn: &Connection, realtor: &CallerIdentity) -> i64 {
    ListingService::new(SqliteListingRepository::try_new(conn).unwrap())
        .create_listing(
            &CreateListingParams {
                address: "1111 Yellow Str".to_string(),
                city: "Toronto".to_string(),
                price: 1_250_000.0,
                property_type: PropertyType::Condo,
                number_of_bedrooms: 2,
                number_of_bathrooms: 1.0,
                land_size: 90.0,
                images: vec!["https://img.example.com/cover.jpg".to_string()],
            },
            realtor.id,
        )
        .unwrap()
        .id
}

fn inquiry_service(
    conn: &Connection,
) -> InquiryService<SqliteListingRepository<'_>, SqliteInquiryRepository<'_>> {
    InquiryService::new(
        SqliteListingRepository::try_new(conn).unwrap(),
        SqliteInquiryRepository::try_new(conn).unwrap(),
    )
}

fn inquiry_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM inquiry_messages;", [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn inquire_on_missing_listing_is_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let buyer = seed_person(&conn, "Buyer");

    let err = inquiry_service(&conn)
        .inquire(&buyer, 77, "is this still available?")
        .unwrap_err();

    assert!(matches!(err, ServiceError::ListingNotFound(77)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(inquiry_count(&conn), 0);
}

#[test]
fn inquire_addresses_the_listing_owner() {
    let conn = open_db_in_memory().unwrap();
    let realtor = seed_person(&conn, "Realtor");
    let buyer = seed_person(&conn, "Buyer");
    let listing_id = seed_listing(&conn, &realtor);

    let inquiry = inquiry_service(&conn)
        .inquire(&buyer, listing_id, "can I book a viewing?")
        .unwrap();

    assert_eq!(inquiry.realtor_id, realtor.id);
    assert_eq!(inquiry.buyer_id, buyer.id);
    assert_eq!(inquiry.listing_id, listing_id);
    assert_eq!(inquiry.message, "can I book a viewing?");
    assert_eq!(inquiry_count(&conn), 1);
}

#[test]
fn buyer_does_not_need_to_be_anyone_in_particular() {
    let conn = open_db_in_memory().unwrap();
    let realtor = seed_person(&conn, "Realtor");
    let listing_id = seed_listing(&conn, &realtor);

    // Realtors may message about their own listings too.
    let inquiry = inquiry_service(&conn)
        .inquire(&realtor, listing_id, "note to self")
        .unwrap();
    assert_eq!(inquiry.buyer_id, inquiry.realtor_id);
}

#[test]
fn list_returns_each_message_with_sender_contact_in_order() {
    let conn = open_db_in_memory().unwrap();
    let realtor = seed_person(&conn, "Realtor");
    let alice = seed_person(&conn, "Alice");
    let bob = seed_person(&conn, "Bob");
    let listing_id = seed_listing(&conn, &realtor);
    let service = inquiry_service(&conn);

    service.inquire(&alice, listing_id, "first").unwrap();
    service.inquire(&bob, listing_id, "second").unwrap();

    let records = service.list_inquiries(listing_id).unwrap();
    assert_eq!(
        records
            .iter()
            .map(|record| record.message.as_str())
            .collect::<Vec<_>>(),
        vec!["first", "second"]
    );
    assert_eq!(
        records[0].buyer,
        BuyerContact {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "555 555 5555".to_string(),
        }
    );
    assert_eq!(records[1].buyer.email, "bob@example.com");

    let value = serde_json::to_value(&records[0]).unwrap();
    assert!(value["buyer"].get("id").is_none());
}

#[test]
fn list_for_unknown_listing_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let records = inquiry_service(&conn).list_inquiries(404).unwrap();
    assert!(records.is_empty());
}

#[test]
fn list_as_owner_checks_ownership() {
    let conn = open_db_in_memory().unwrap();
    let realtor = seed_person(&conn, "Realtor");
    let buyer = seed_person(&conn, "Buyer");
    let listing_id = seed_listing(&conn, &realtor);
    let service = inquiry_service(&conn);
    service.inquire(&buyer, listing_id, "hello").unwrap();

    let denied = service
        .list_inquiries_as_owner(listing_id, &buyer)
        .unwrap_err();
    assert_eq!(denied.kind(), ErrorKind::Unauthorized);

    let missing = service.list_inquiries_as_owner(404, &realtor).unwrap_err();
    assert!(matches!(missing, ServiceError::ListingNotFound(404)));

    let records = service
        .list_inquiries_as_owner(listing_id, &realtor)
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].buyer.name, "Buyer");
}

#[test]
fn stored_inquiries_cannot_be_edited() {
    let conn = open_db_in_memory().unwrap();
    let realtor = seed_person(&conn, "Realtor");
    let buyer = seed_person(&conn, "Buyer");
    let listing_id = seed_listing(&conn, &realtor);
    let inquiry = inquiry_service(&conn)
        .inquire(&buyer, listing_id, "original")
        .unwrap();

    let err = conn
        .execute(
            "UPDATE inquiry_messages SET message = 'edited' WHERE id = ?1;",
            [inquiry.id],
        )
        .unwrap_err();
    assert!(err.to_string().contains("immutable"));

    let records = inquiry_service(&conn).list_inquiries(listing_id).unwrap();
    assert_eq!(records[0].message, "original");
}

#[test]
fn deleting_listing_removes_its_inquiries() {
    let conn = open_db_in_memory().unwrap();
    let realtor = seed_person(&conn, "Realtor");
    let buyer = seed_person(&conn, "Buyer");
    let kept = seed_listing(&conn, &realtor);
    let removed = seed_listing(&conn, &realtor);
    let service = inquiry_service(&conn);
    service.inquire(&buyer, kept, "keep me").unwrap();
    service.inquire(&buyer, removed, "drop me").unwrap();

    ListingService::new(SqliteListingRepository::try_new(&conn).unwrap())
        .delete_listing(removed, &realtor)
        .unwrap();

    assert!(service.list_inquiries(removed).unwrap().is_empty());
    assert_eq!(service.list_inquiries(kept).unwrap().len(), 1);
    assert!(matches!(
        service.inquire(&buyer, removed, "again").unwrap_err(),
        ServiceError::ListingNotFound(_)
    ));
}
