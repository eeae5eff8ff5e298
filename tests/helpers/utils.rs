use chrono::NaiveDate;
use frontdesk_domain::{Appointment, AppointmentStatus, Business, ID};
use frontdesk_infra::FrontdeskContext;

/// 2024-03-14T10:00:00Z, a Thursday
pub const NOW: i64 = 1_710_410_400_000;

pub const BUSINESS_NUMBER: &str = "+15550009999";
pub const OWNER: &str = "+15550002222";
pub const CUSTOMER: &str = "+15550001111";

pub async fn create_business(ctx: &FrontdeskContext) -> Business {
    let mut business = Business::new("Bloom Salon");
    business.phone_number = Some(BUSINESS_NUMBER.into());
    business.owner_phone = Some(OWNER.into());
    business.booking_link = Some("https://book.me/bloom".into());
    business.id = ctx
        .repos
        .businesses
        .insert(&business)
        .await
        .expect("Expected to create business");
    business
}

pub async fn create_appointment(
    ctx: &FrontdeskContext,
    business: &Business,
    date: NaiveDate,
) -> ID {
    let appointment = Appointment {
        id: ID::new(),
        business_id: Some(business.id.clone()),
        customer_name: "Ada".into(),
        customer_phone: CUSTOMER.into(),
        customer_email: "ada@example.com".into(),
        date,
        time: "3:00 PM".into(),
        service: "Haircut".into(),
        status: AppointmentStatus::Scheduled,
        reminders_sent: Default::default(),
        customer_response: None,
        external_event: None,
    };
    ctx.repos
        .appointments
        .insert(&appointment)
        .await
        .expect("Expected to create appointment")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Expected a valid date")
}
