use barbershop_booking_api::{
    error::AppError,
    middleware::auth::{AuthUser, Role},
    models::AppointmentStatus,
    services::booking_service::{BookingRequest, BookingService, today},
    slots::ShopHours,
    store::MemoryStore,
};
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use uuid::Uuid;

fn next(weekday: Weekday) -> NaiveDate {
    let mut date = today() + Days::new(1);
    while date.weekday() != weekday {
        date = date + Days::new(1);
    }
    date
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

struct Shop {
    booking: BookingService<MemoryStore>,
    store: MemoryStore,
    service_id: Uuid,
    barber_id: Uuid,
}

fn shop() -> Shop {
    let store = MemoryStore::new();
    let service = store.add_service("Combo Corte + Barba", 6000, 30);
    let barber = store.add_barber("Rafael");
    Shop {
        booking: BookingService::new(store.clone(), ShopHours::default()),
        store,
        service_id: service.id,
        barber_id: barber.id,
    }
}

fn customer(shop: &Shop, name: &str) -> (AuthUser, Uuid) {
    let user_id = Uuid::new_v4();
    let profile = shop.store.add_profile(user_id, name);
    (AuthUser { user_id, role: Role::Customer }, profile.id)
}

fn request(shop: &Shop, customer_id: Uuid, date: NaiveDate, start: NaiveTime) -> BookingRequest {
    BookingRequest {
        customer_id,
        barber_id: shop.barber_id,
        service_id: shop.service_id,
        date,
        start_time: start,
        notes: None,
    }
}

// Book, see the slot disappear, cancel, see it come back.
#[tokio::test]
async fn booking_and_cancelling_a_tuesday_slot() {
    let shop = shop();
    let tuesday = next(Weekday::Tue);
    let (ana, ana_profile) = customer(&shop, "Ana");

    let before = shop
        .booking
        .list_available_slots(shop.barber_id, tuesday)
        .await
        .unwrap();
    assert_eq!(before.len(), 12);
    assert_eq!(before.first(), Some(&at(10, 0)));
    assert_eq!(before.last(), Some(&at(17, 20)));
    assert!(before.contains(&at(14, 0)));

    let appointment = shop
        .booking
        .create_appointment(request(&shop, ana_profile, tuesday, at(14, 0)))
        .await
        .unwrap();
    assert_eq!(appointment.start_time, at(14, 0));
    assert_eq!(appointment.end_time, at(14, 30));
    assert_eq!(appointment.status, AppointmentStatus::Pending);

    let during = shop
        .booking
        .list_available_slots(shop.barber_id, tuesday)
        .await
        .unwrap();
    assert_eq!(during.len(), 11);
    assert!(!during.contains(&at(14, 0)));

    shop.booking
        .cancel_appointment(appointment.id, &ana)
        .await
        .unwrap();
    let after = shop
        .booking
        .list_available_slots(shop.barber_id, tuesday)
        .await
        .unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn two_customers_racing_for_one_slot() {
    let shop = shop();
    let wednesday = next(Weekday::Wed);
    let (_, ana) = customer(&shop, "Ana");
    let (_, bruno) = customer(&shop, "Bruno");

    let (first, second) = tokio::join!(
        shop.booking
            .create_appointment(request(&shop, ana, wednesday, at(15, 20))),
        shop.booking
            .create_appointment(request(&shop, bruno, wednesday, at(15, 20))),
    );

    let results = [first, second];
    let won = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(won, 1);
    assert_eq!(conflicts, 1);

    let active: Vec<_> = shop
        .store
        .appointments()
        .into_iter()
        .filter(|a| a.status.is_active() && a.start_time == at(15, 20))
        .collect();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn other_barbers_keep_their_slots() {
    let shop = shop();
    let thursday = next(Weekday::Thu);
    let other = shop.store.add_barber("Diego");
    let (_, ana) = customer(&shop, "Ana");

    shop.booking
        .create_appointment(request(&shop, ana, thursday, at(10, 0)))
        .await
        .unwrap();

    let slots = shop
        .booking
        .list_available_slots(other.id, thursday)
        .await
        .unwrap();
    assert_eq!(slots.len(), 12);
}

#[tokio::test]
async fn sundays_are_closed() {
    let shop = shop();
    let sunday = next(Weekday::Sun);
    let (_, ana) = customer(&shop, "Ana");

    assert!(shop
        .booking
        .list_available_slots(shop.barber_id, sunday)
        .await
        .unwrap()
        .is_empty());
    let err = shop
        .booking
        .create_appointment(request(&shop, ana, sunday, at(10, 0)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(!shop.booking.open_days(today(), 30).contains(&sunday));
}

#[tokio::test]
async fn repeated_cancel_changes_nothing() {
    let shop = shop();
    let friday = next(Weekday::Fri);
    let (ana, ana_profile) = customer(&shop, "Ana");
    let (_, bruno_profile) = customer(&shop, "Bruno");

    let mine = shop
        .booking
        .create_appointment(request(&shop, ana_profile, friday, at(11, 20)))
        .await
        .unwrap();
    let theirs = shop
        .booking
        .create_appointment(request(&shop, bruno_profile, friday, at(12, 0)))
        .await
        .unwrap();

    for _ in 0..3 {
        let cancelled = shop.booking.cancel_appointment(mine.id, &ana).await.unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    }

    let stored = shop.store.appointments();
    assert_eq!(stored.len(), 2);
    let untouched = stored.iter().find(|a| a.id == theirs.id).unwrap();
    assert_eq!(untouched.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn custom_hours_change_the_grid() {
    let store = MemoryStore::new();
    let barber = store.add_barber("Rafael");
    let hours = ShopHours {
        open_time: at(9, 0),
        close_time: at(12, 0),
        slot_interval_minutes: 30,
        closed_days: vec![Weekday::Sun, Weekday::Mon],
    };
    let booking = BookingService::new(store, hours);

    let slots = booking
        .list_available_slots(barber.id, next(Weekday::Tue))
        .await
        .unwrap();
    assert_eq!(slots, vec![at(9, 0), at(9, 30), at(10, 0), at(10, 30), at(11, 0), at(11, 30)]);
    assert!(booking
        .list_available_slots(barber.id, next(Weekday::Mon))
        .await
        .unwrap()
        .is_empty());
}
