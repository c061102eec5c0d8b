use delivery_fee::fees::{FeeCalculator, FeeSchedule};
use delivery_fee::orders::{validate, Quote, RawOrderInput};
use delivery_fee::report::{quote_json, read_batch, run_batch, write_batch};
use std::fs;
use tempfile::TempDir;

const ORDERS: &str = "cart_value,delivery_distance,item_count,order_time
15,1777,1,2024-01-26 15:23:42
6.7,500,1,2024-01-24 14:23:42
0,500,1,2024-01-24 14:23:42
15,12.5,1,2024-01-24 14:23:42
15,500,1,
";

#[test]
fn test_read_batch_quotes_each_row() {
    let calc = FeeCalculator::default();
    let rows = read_batch(&calc, ORDERS.as_bytes()).unwrap();
    assert_eq!(rows.len(), 5);

    assert!((rows[0].fee.unwrap() - 4.8).abs() < 1e-9);
    assert_eq!(rows[0].warning, None);
    assert!((rows[1].fee.unwrap() - 5.3).abs() < 1e-9);

    assert_eq!(rows[2].fee, None);
    assert_eq!(rows[2].warning.as_deref(), Some("Cart value"));
    assert_eq!(rows[3].warning.as_deref(), Some("Delivery distance"));
    assert_eq!(rows[4].warning.as_deref(), Some("Order time"));
}

#[test]
fn test_write_batch_format() {
    let calc = FeeCalculator::default();
    let rows = read_batch(&calc, ORDERS.as_bytes()).unwrap();

    let mut out = Vec::new();
    write_batch(&rows[2..3], &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "cart_value,delivery_distance,item_count,order_time,fee,warning\n\
         0,500,1,2024-01-24 14:23:42,,Cart value\n"
    );
}

#[test]
fn test_run_batch_with_files() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("orders.csv");
    let out = dir.path().join("fees.csv");
    fs::write(&input, ORDERS).unwrap();

    let calc = FeeCalculator::default();
    let rows = run_batch(&calc, &input, &out).unwrap();
    assert_eq!(rows.len(), 5);

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 6);
    assert!(written.lines().nth(4).unwrap().ends_with(",Delivery distance"));
}

#[test]
fn test_run_batch_missing_input() {
    let dir = TempDir::new().unwrap();
    let calc = FeeCalculator::default();
    let err = run_batch(&calc, &dir.path().join("missing.csv"), &dir.path().join("out.csv"))
        .unwrap_err();
    assert!(err.to_string().contains("Failed to open batch file"));
}

#[test]
fn test_schedule_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schedule.json");
    fs::write(&path, r#"{"base_fee": 2.5, "rush_hour_day": "Sat"}"#).unwrap();

    let schedule = FeeSchedule::from_file(&path).unwrap();
    assert_eq!(schedule.base_fee, 2.5);
    assert_eq!(schedule.rush_hour_day, chrono::Weekday::Sat);
    assert_eq!(schedule.max_fee, 15.0);

    fs::write(&path, r#"{"distance_step_m": 0}"#).unwrap();
    assert!(FeeSchedule::from_file(&path).is_err());
}

#[test]
fn test_quote_json() {
    let raw = RawOrderInput {
        cart_value: Some(15.0),
        delivery_distance: Some(1777.0),
        item_count: Some(1.0),
        order_time: delivery_fee::util::parse_order_time("2024-01-25 19:23:42"),
    };
    let order = validate(&raw).unwrap();
    let json = quote_json(&Quote { order, fee: 4.0 }).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["fee"], 4.0);
    assert_eq!(value["order"]["delivery_distance_m"], 1777);
    assert_eq!(value["order"]["order_time"], "2024-01-25T19:23:42");
}
