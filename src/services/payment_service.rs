use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit,
    dto::payments::{FinancialSummary, MethodTotal, RecordPaymentRequest},
    entity::{
        appointments::{ActiveModel as AppointmentActive, Entity as Appointments},
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{AppointmentStatus, Payment, PaymentMethod},
    response::ApiResponse,
    routes::params::{FinanceQuery, Period},
    services::booking_service::today,
    state::AppState,
};

/// Records a payment and flags the appointment as paid, both in one
/// transaction holding the appointment row lock.
pub async fn record_payment(
    state: &AppState,
    user: &AuthUser,
    payload: RecordPaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    ensure_staff(user)?;
    if payload.amount <= 0 {
        return Err(AppError::BadRequest("amount must be greater than zero".into()));
    }

    let txn = state.orm.begin().await?;

    let appointment = Appointments::find_by_id(payload.appointment_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let status = appointment
        .status
        .parse::<AppointmentStatus>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    ensure_payable(status, appointment.paid)?;

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        appointment_id: Set(appointment.id),
        amount: Set(payload.amount),
        method: Set(payload.method.as_str().to_string()),
        paid_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut active: AppointmentActive = appointment.into();
    active.paid = Set(true);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        payment_id = %payment.id,
        appointment_id = %payment.appointment_id,
        amount = payment.amount,
        method = %payment.method,
        "payment recorded"
    );
    audit(
        &state.pool,
        user.user_id,
        "payment_record",
        "payments",
        serde_json::json!({
            "payment_id": payment.id,
            "appointment_id": payment.appointment_id,
            "amount": payment.amount,
        }),
    )
    .await;

    Ok(ApiResponse::ok("Payment recorded", payment_from_entity(payment)?))
}

pub async fn financial_summary(
    state: &AppState,
    user: &AuthUser,
    query: FinanceQuery,
) -> AppResult<ApiResponse<FinancialSummary>> {
    ensure_admin(user)?;
    let (from, to) = period_range(query.period, query.from, query.to, today())?;

    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = to
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::BadRequest("date range out of bounds".into()))?
        .and_time(NaiveTime::MIN)
        .and_utc();

    let payments = Payments::find()
        .filter(PaymentCol::PaidAt.gte(start))
        .filter(PaymentCol::PaidAt.lt(end))
        .order_by_desc(PaymentCol::PaidAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let by_method = totals_by_method(&payments);
    let total: i64 = by_method.iter().map(|m| m.total).sum();
    let count = payments.len() as i64;
    let summary = FinancialSummary {
        from,
        to,
        total,
        count,
        average: average_ticket(total, count),
        by_method,
        payments,
    };
    Ok(ApiResponse::ok("Financial summary", summary))
}

/// An appointment takes a single payment, and only once the service is done.
pub fn ensure_payable(status: AppointmentStatus, paid: bool) -> AppResult<()> {
    match status {
        AppointmentStatus::Cancelled => Err(AppError::Conflict(
            "cannot record a payment for a cancelled appointment".into(),
        )),
        AppointmentStatus::Pending | AppointmentStatus::Confirmed => Err(AppError::Conflict(
            "appointment must be completed before it is paid".into(),
        )),
        AppointmentStatus::Completed if paid => {
            Err(AppError::Conflict("appointment is already paid".into()))
        }
        AppointmentStatus::Completed => Ok(()),
    }
}

/// Mean payment in cents, rounded down; zero when nothing was paid.
pub fn average_ticket(total: i64, count: i64) -> i64 {
    if count == 0 { 0 } else { total / count }
}

/// Inclusive date range for a summary. Explicit bounds win over `period`;
/// with neither, the current month is used.
pub fn period_range(
    period: Option<Period>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> AppResult<(NaiveDate, NaiveDate)> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => {
            Err(AppError::BadRequest("`from` must not be after `to`".into()))
        }
        (Some(from), Some(to)) => Ok((from, to)),
        (Some(_), None) | (None, Some(_)) => Err(AppError::BadRequest(
            "`from` and `to` must be given together".into(),
        )),
        (None, None) => {
            let out_of_range = || AppError::BadRequest("date out of range".into());
            match period.unwrap_or(Period::Month) {
                Period::Month => {
                    let first = today.with_day(1).ok_or_else(out_of_range)?;
                    let last = first
                        .checked_add_months(Months::new(1))
                        .and_then(|d| d.pred_opt())
                        .ok_or_else(out_of_range)?;
                    Ok((first, last))
                }
                Period::Year => {
                    let first =
                        NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(out_of_range)?;
                    let last =
                        NaiveDate::from_ymd_opt(today.year(), 12, 31).ok_or_else(out_of_range)?;
                    Ok((first, last))
                }
            }
        }
    }
}

/// Per-method count and sum, in [`PaymentMethod::ALL`] order, skipping
/// methods with no payments.
pub fn totals_by_method(payments: &[Payment]) -> Vec<MethodTotal> {
    PaymentMethod::ALL
        .into_iter()
        .filter_map(|method| {
            let (count, total) = payments
                .iter()
                .filter(|p| p.method == method)
                .fold((0i64, 0i64), |(c, t), p| (c + 1, t + p.amount));
            (count > 0).then_some(MethodTotal { method, count, total })
        })
        .collect()
}

pub fn payment_from_entity(model: PaymentModel) -> AppResult<Payment> {
    let method = model
        .method
        .parse::<PaymentMethod>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(Payment {
        id: model.id,
        appointment_id: model.appointment_id,
        amount: model.amount,
        method,
        paid_at: model.paid_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(Some(Period::Month), date(2026, 2, 14) => (date(2026, 2, 1), date(2026, 2, 28)) ; "february")]
    #[test_case(None, date(2026, 12, 31) => (date(2026, 12, 1), date(2026, 12, 31)) ; "december by default")]
    #[test_case(Some(Period::Year), date(2028, 7, 3) => (date(2028, 1, 1), date(2028, 12, 31)) ; "whole year")]
    fn period_bounds(period: Option<Period>, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        period_range(period, None, None, today).unwrap()
    }

    #[test]
    fn explicit_bounds_must_be_ordered_and_paired() {
        let today = date(2026, 10, 19);
        assert_eq!(
            period_range(Some(Period::Year), Some(date(2026, 3, 1)), Some(date(2026, 3, 5)), today)
                .unwrap(),
            (date(2026, 3, 1), date(2026, 3, 5))
        );
        assert!(matches!(
            period_range(None, Some(date(2026, 3, 5)), Some(date(2026, 3, 1)), today),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            period_range(None, Some(date(2026, 3, 5)), None, today),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test_case(AppointmentStatus::Completed, false => true ; "completed and unpaid")]
    #[test_case(AppointmentStatus::Completed, true => false ; "already paid")]
    #[test_case(AppointmentStatus::Pending, false => false ; "pending")]
    #[test_case(AppointmentStatus::Confirmed, false => false ; "confirmed but not done")]
    #[test_case(AppointmentStatus::Cancelled, false => false ; "cancelled")]
    fn payable(status: AppointmentStatus, paid: bool) -> bool {
        match ensure_payable(status, paid) {
            Ok(()) => true,
            Err(AppError::Conflict(_)) => false,
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn average_is_zero_without_payments() {
        assert_eq!(average_ticket(0, 0), 0);
        assert_eq!(average_ticket(13500, 3), 4500);
        assert_eq!(average_ticket(10001, 2), 5000);
    }

    #[test]
    fn totals_group_by_method() {
        let payment = |amount, method| Payment {
            id: Uuid::new_v4(),
            appointment_id: Uuid::new_v4(),
            amount,
            method,
            paid_at: Utc::now(),
        };
        let payments = vec![
            payment(4000, PaymentMethod::Pix),
            payment(3500, PaymentMethod::Cash),
            payment(6000, PaymentMethod::Pix),
        ];

        assert_eq!(
            totals_by_method(&payments),
            vec![
                MethodTotal { method: PaymentMethod::Cash, count: 1, total: 3500 },
                MethodTotal { method: PaymentMethod::Pix, count: 2, total: 10000 },
            ]
        );
        assert!(totals_by_method(&[]).is_empty());
    }
}
