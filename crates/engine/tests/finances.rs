use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    EngineError, ExpenseFields, ExpenseWrite, Finances, Ledger, NO_DATA, Period, QueryCache,
    ReportFilter,
};
use migration::MigratorTrait;
use std::sync::Arc;

async fn finances_with_db() -> (Finances, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let finances = Finances::builder()
        .database(db.clone())
        .cache(Arc::new(QueryCache::new()))
        .build()
        .await
        .unwrap();
    (finances, db)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fields(description: &str, amount_minor: i64, date: NaiveDate, category: &str) -> ExpenseFields {
    ExpenseFields {
        description: description.to_string(),
        amount_minor,
        date,
        category: category.to_string(),
    }
}

async fn insert(finances: &Finances, description: &str, amount: i64, date: NaiveDate, category: &str) -> i64 {
    finances
        .record_expense(ExpenseWrite::Insert(fields(description, amount, date, category)))
        .await
        .unwrap()
}

/// Writes straight to the table, behind the façade's back.
async fn insert_raw(db: &DatabaseConnection, description: &str, amount: i64, date: NaiveDate, category: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO expenses (date, description, amount, category_id) \
         VALUES (?, ?, ?, (SELECT id FROM categories WHERE name = ?))",
        vec![date.into(), description.into(), amount.into(), category.into()],
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn recorded_expense_lists_back_identically() {
    let (finances, _db) = finances_with_db().await;

    let id = insert(&finances, "Lunch", 1250, day(2024, 3, 5), "food").await;

    let (list, total) = finances.list_expenses(Some("food"), 3, 2024).await.unwrap();
    assert_eq!(total, 1250);
    assert_eq!(list.len(), 1);
    let expense = &list[0];
    assert_eq!(expense.id, id);
    assert_eq!(expense.description, "Lunch");
    assert_eq!(expense.amount_minor, 1250);
    assert_eq!(expense.date, day(2024, 3, 5));
    assert_eq!(expense.category, "food");
    assert_eq!(expense.color, "#ef5350");
}

#[tokio::test]
async fn listing_is_cached_until_the_next_write() {
    let (finances, db) = finances_with_db().await;
    insert(&finances, "Bus", 200, day(2024, 3, 1), "transport").await;

    let (first, _) = finances.list_expenses(None, 3, 2024).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(finances.cache().len().await, 2);

    // Not seen: the listing comes from the cache.
    insert_raw(&db, "Taxi", 900, day(2024, 3, 2), "transport").await;
    let (cached, cached_total) = finances.list_expenses(None, 3, 2024).await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached_total, 200);

    // Any write through the façade invalidates everything.
    insert(&finances, "Apples", 300, day(2023, 1, 10), "groceries").await;
    let (fresh, fresh_total) = finances.list_expenses(None, 3, 2024).await.unwrap();
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh_total, 1100);
}

#[tokio::test]
async fn update_replaces_every_field_and_invalidates_the_cache() {
    let (finances, _db) = finances_with_db().await;
    let id = insert(&finances, "Lunch", 1250, day(2024, 3, 5), "food").await;
    finances.list_expenses(Some("food"), 3, 2024).await.unwrap();

    let updated = finances
        .record_expense(ExpenseWrite::from_wire_id(
            id,
            fields("Train", 4000, day(2024, 3, 9), "transport"),
        ))
        .await
        .unwrap();
    assert_eq!(updated, id);

    let (food, food_total) = finances.list_expenses(Some("food"), 3, 2024).await.unwrap();
    assert!(food.is_empty());
    assert_eq!(food_total, 0);

    let (transport, _) = finances
        .list_expenses(Some("transport"), 3, 2024)
        .await
        .unwrap();
    assert_eq!(transport.len(), 1);
    assert_eq!(transport[0].id, id);
    assert_eq!(transport[0].description, "Train");
    assert_eq!(transport[0].amount_minor, 4000);
    assert_eq!(transport[0].date, day(2024, 3, 9));
    assert_eq!(transport[0].color, "#42a5f5");
}

#[tokio::test]
async fn updating_a_missing_expense_is_not_found() {
    let (finances, _db) = finances_with_db().await;

    let err = finances
        .record_expense(ExpenseWrite::Update {
            id: 999,
            fields: fields("Ghost", 1, day(2024, 3, 1), "food"),
        })
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("expense 999".to_string()));
}

#[tokio::test]
async fn unknown_category_fails_the_write() {
    let (finances, _db) = finances_with_db().await;

    let err = finances
        .record_expense(ExpenseWrite::Insert(fields("Rent", 90000, day(2024, 3, 1), "rent")))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("category 'rent'".to_string()));
    let (list, total) = finances.list_expenses(None, 3, 2024).await.unwrap();
    assert!(list.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn listing_is_newest_first_and_scoped_to_the_month() {
    let (finances, _db) = finances_with_db().await;
    insert(&finances, "first", 1, day(2024, 3, 1), "misc").await;
    insert(&finances, "last", 2, day(2024, 3, 31), "food").await;
    insert(&finances, "middle", 3, day(2024, 3, 15), "misc").await;
    insert(&finances, "february", 4, day(2024, 2, 29), "misc").await;
    insert(&finances, "april", 5, day(2024, 4, 1), "misc").await;

    let (list, total) = finances.list_expenses(Some(""), 3, 2024).await.unwrap();
    let names: Vec<&str> = list.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(names, ["last", "middle", "first"]);
    assert_eq!(total, 6);
}

#[tokio::test]
async fn listing_an_invalid_month_is_rejected() {
    let (finances, _db) = finances_with_db().await;

    let err = finances.list_expenses(None, 13, 2024).await.unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn month_report_breaks_spending_down_by_category() {
    let (finances, _db) = finances_with_db().await;
    insert(&finances, "Dinner", 500, day(2024, 3, 1), "food").await;
    insert(&finances, "Lunch", 300, day(2024, 3, 2), "food").await;
    insert(&finances, "Bus", 200, day(2024, 3, 3), "transport").await;
    insert(&finances, "Other month", 7000, day(2024, 4, 1), "transport").await;

    let report = finances.month_report(3, 2024).await.unwrap();

    assert_eq!(report.total_minor, 1000);
    assert_eq!(report.categories.len(), 2);
    let food = report.categories.iter().find(|c| c.name == "food").unwrap();
    assert_eq!(food.amount_minor, 800);
    assert_eq!(food.percent, 80.0);
    assert_eq!(food.color, "#ef5350");
    let transport = report
        .categories
        .iter()
        .find(|c| c.name == "transport")
        .unwrap();
    assert_eq!(transport.amount_minor, 200);
    assert_eq!(transport.percent, 20.0);
    // Daily totals [500, 300, 200].
    assert_eq!(report.median_minor, 300);
    assert_eq!(report.mean_minor, 333);
}

#[tokio::test]
async fn daily_totals_sum_expenses_of_the_same_day() {
    let (finances, _db) = finances_with_db().await;
    insert(&finances, "a", 100, day(2024, 3, 1), "food").await;
    insert(&finances, "b", 200, day(2024, 3, 1), "misc").await;
    insert(&finances, "c", 100, day(2024, 3, 2), "food").await;

    let report = finances.month_report(3, 2024).await.unwrap();

    // Daily totals [300, 100]: upper middle, truncated mean.
    assert_eq!(report.median_minor, 300);
    assert_eq!(report.mean_minor, 200);
}

#[tokio::test]
async fn empty_period_reports_no_data() {
    let (finances, _db) = finances_with_db().await;

    let report = finances.month_report(3, 2024).await.unwrap();

    assert_eq!(report.total_minor, 0);
    assert!(report.categories.is_empty());
    assert_eq!(report.mean_minor, NO_DATA);
    assert_eq!(report.median_minor, NO_DATA);
}

#[tokio::test]
async fn zero_total_period_has_zero_percentages() {
    let (finances, _db) = finances_with_db().await;
    insert(&finances, "Purchase", 500, day(2024, 3, 1), "misc").await;
    insert(&finances, "Refund", -500, day(2024, 3, 1), "food").await;

    let report = finances.month_report(3, 2024).await.unwrap();

    assert_eq!(report.total_minor, 0);
    assert_eq!(report.categories.len(), 2);
    assert!(report.categories.iter().all(|c| c.percent == 0.0));
    assert_eq!(report.mean_minor, 0);
}

#[tokio::test]
async fn week_report_only_counts_the_anchor_week() {
    let (finances, _db) = finances_with_db().await;
    // Week of Thursday 2024-03-07 is Monday 4th to Sunday 10th.
    insert(&finances, "Sunday before", 100, day(2024, 3, 3), "food").await;
    insert(&finances, "Monday", 200, day(2024, 3, 4), "food").await;
    insert(&finances, "Sunday", 300, day(2024, 3, 10), "food").await;
    insert(&finances, "Monday after", 400, day(2024, 3, 11), "food").await;

    let report = finances
        .report(ReportFilter::Week, day(2024, 3, 7))
        .await
        .unwrap();

    assert_eq!(report.filter, ReportFilter::Week);
    assert_eq!(report.total_minor, 500);
}

#[tokio::test]
async fn year_report_spans_the_calendar_year() {
    let (finances, _db) = finances_with_db().await;
    insert(&finances, "January", 100, day(2024, 1, 1), "food").await;
    insert(&finances, "December", 200, day(2024, 12, 31), "food").await;
    insert(&finances, "Next year", 400, day(2025, 1, 1), "food").await;

    let report = finances
        .report(ReportFilter::Year, day(2024, 6, 1))
        .await
        .unwrap();

    assert_eq!(report.total_minor, 300);
}

#[tokio::test]
async fn massive_report_covers_thirteen_months_across_new_year() {
    let (finances, _db) = finances_with_db().await;
    insert(&finances, "a year ago", 100, day(2024, 1, 15), "food").await;
    insert(&finances, "too old", 9999, day(2023, 12, 31), "food").await;
    insert(&finances, "december", 200, day(2024, 12, 24), "misc").await;
    insert(&finances, "this month", 300, day(2025, 1, 2), "transport").await;

    let massive = finances.massive_report(day(2025, 1, 20)).await.unwrap();

    assert_eq!(massive.months.len(), 13);
    let labels: Vec<String> = massive.months.iter().map(|m| m.label()).collect();
    assert_eq!(labels.first().map(String::as_str), Some("01.2024"));
    assert_eq!(labels[11], "12.2024");
    assert_eq!(labels.last().map(String::as_str), Some("01.2025"));

    assert_eq!(massive.months[0].report.total_minor, 100);
    assert_eq!(massive.months[1].report.total_minor, 0);
    assert_eq!(massive.months[1].report.median_minor, NO_DATA);
    assert_eq!(massive.months[11].report.total_minor, 200);
    assert_eq!(massive.months[12].report.total_minor, 300);
    assert!(
        massive
            .months
            .iter()
            .all(|m| m.report.filter == ReportFilter::Month)
    );
}

#[tokio::test]
async fn categories_resolve_by_id_and_name() {
    let (finances, _db) = finances_with_db().await;

    let categories = finances.list_categories().await.unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["food", "groceries", "misc", "transport"]);

    let food = finances.category_by_name("food").await.unwrap();
    assert_eq!(finances.category_by_id(food.id).await.unwrap(), food);

    assert!(matches!(
        finances.category_by_name("rent").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        finances.category_by_id(-1).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn overflowing_listing_total_is_an_error() {
    let (finances, _db) = finances_with_db().await;
    insert(&finances, "Yacht", i64::MAX, day(2024, 3, 1), "misc").await;
    insert(&finances, "Gum", 1, day(2024, 3, 2), "food").await;

    assert_eq!(
        finances.list_expenses(None, 3, 2024).await,
        Err(EngineError::InvalidInput("expense total overflows".to_string()))
    );
    // The failed listing is not cached.
    assert!(finances.cache().is_empty().await);
}

#[tokio::test]
async fn undecodable_period_total_is_not_reported_as_zero() {
    let (_finances, db) = finances_with_db().await;
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO expenses (date, description, amount, category_id) \
         VALUES (?, 'Half', 1.5, (SELECT id FROM categories WHERE name = 'food'))",
        vec![day(2024, 3, 4).into()],
    ))
    .await
    .unwrap();

    let period = Period::month(2024, 3).unwrap();
    let total = Ledger::new(&db).period_total(&period).await;

    assert!(matches!(total, Err(EngineError::Database(_))));
}

#[tokio::test]
async fn unique_violation_on_insert_is_an_existing_key() {
    let (finances, db) = finances_with_db().await;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE UNIQUE INDEX idx_expenses_description ON expenses (description)",
    ))
    .await
    .unwrap();
    insert(&finances, "Rent", 90000, day(2024, 3, 1), "misc").await;

    let again = finances
        .record_expense(ExpenseWrite::Insert(fields("Rent", 90000, day(2024, 4, 1), "misc")))
        .await;

    assert_eq!(again, Err(EngineError::ExistingKey("expense".to_string())));
}
