use super::*;
use chrono::Days;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeDelta;
use chrono::Weekday;
use regex::Regex;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;
use std::sync::LazyLock;

/// The four client-writable columns, in canonical validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FromTown,
    Airline,
    ArrivalTime,
    IsLate,
}

impl Field {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FromTown => "from_town",
            Self::Airline => "airline",
            Self::ArrivalTime => "arrival_time",
            Self::IsLate => "is_late",
        }
    }
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::FromTown => "'from_town' field must be 3-64 characters long!",
            Self::Airline => "'airline' field must be 3-32 characters long!",
            Self::ArrivalTime => "Not valid date format! Please enter: 'YYYY-MM-DD HH:MM'.",
            Self::IsLate => "'is_late' field must be 0 or 1!",
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A single failed field constraint, shaped for the 400 response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    msg: &'static str,
    path: Field,
    location: &'static str,
}

impl Violation {
    fn new(field: Field, value: Option<&Value>) -> Self {
        Self {
            kind: "field",
            value: value.cloned(),
            msg: field.reason(),
            path: field,
            location: "body",
        }
    }
    pub fn field(&self) -> Field {
        self.path
    }
    pub fn reason(&self) -> &'static str {
        self.msg
    }
}

/// A write payload that passed every field constraint.
///
/// Holds the normalized column values bound into SQL alongside the body
/// exactly as submitted, which is what create and update echo back.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    from_town: String,
    airline: String,
    arrival_time: NaiveDateTime,
    is_late: i16,
    body: Map<String, Value>,
}

impl Draft {
    /// Checks every field and collects all failures in canonical order.
    pub fn validate(body: Value) -> Result<Self, Vec<Violation>> {
        let body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let from_town = length(&body, Field::FromTown, 3, 64);
        let airline = length(&body, Field::Airline, 3, 32);
        let arrival_time = timestamp(&body, Field::ArrivalTime);
        let is_late = flag(&body, Field::IsLate);
        match (from_town, airline, arrival_time, is_late) {
            (Ok(from_town), Ok(airline), Ok(arrival_time), Ok(is_late)) => Ok(Self {
                from_town,
                airline,
                arrival_time,
                is_late,
                body,
            }),
            (from_town, airline, arrival_time, is_late) => Err([
                from_town.err(),
                airline.err(),
                arrival_time.err(),
                is_late.err(),
            ]
            .into_iter()
            .flatten()
            .collect()),
        }
    }
    pub fn from_town(&self) -> &str {
        &self.from_town
    }
    pub fn airline(&self) -> &str {
        &self.airline
    }
    pub fn arrival_time(&self) -> NaiveDateTime {
        self.arrival_time
    }
    pub fn is_late(&self) -> i16 {
        self.is_late
    }
    /// The submitted body with the storage-assigned `id` in front.
    pub fn echo(&self, id: i32) -> Value {
        let mut object = Map::with_capacity(self.body.len() + 1);
        object.insert(String::from("id"), Value::from(id));
        object.extend(
            self.body
                .iter()
                .filter(|(key, _)| key.as_str() != "id")
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Value::Object(object)
    }
}

fn length(
    body: &Map<String, Value>,
    field: Field,
    min: usize,
    max: usize,
) -> Result<String, Violation> {
    let value = body.get(field.name());
    let text = loose::text(value);
    // emoji presentation selectors do not count as characters
    match text.chars().filter(|c| !matches!(c, '\u{FE0E}' | '\u{FE0F}')).count() {
        n if (min..=max).contains(&n) => Ok(text),
        _ => Err(Violation::new(field, value)),
    }
}

fn timestamp(body: &Map<String, Value>, field: Field) -> Result<NaiveDateTime, Violation> {
    let value = body.get(field.name());
    iso8601(&loose::text(value)).ok_or_else(|| Violation::new(field, value))
}

fn flag(body: &Map<String, Value>, field: Field) -> Result<i16, Violation> {
    let value = body.get(field.name());
    match value {
        v if loose::equals(v, 0.0) => Ok(0),
        v if loose::equals(v, 1.0) => Ok(1),
        _ => Err(Violation::new(field, value)),
    }
}

/// Extended and basic ISO-8601: calendar, week and ordinal dates, an
/// optional time of day down to fractional seconds, and an optional zone.
/// Separator consistency is checked after matching.
static GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<year>[+-]?[0-9]{4})
        (?:
            (?P<datesep>-?)
            (?:
                (?P<month>0[1-9]|1[0-2])
                (?:(?P<daysep>-?)(?P<day>0[1-9]|[12][0-9]|3[01]))?
              | W(?P<week>[0-4][0-9]|5[0-3])(?:-?(?P<weekday>[1-7]))?
              | (?P<ordinal>00[1-9]|0[1-9][0-9]|[12][0-9]{2}|3(?:[0-5][0-9]|6[1-6]))
            )
            (?:
                [T\s]
                (?:
                    (?P<hour>[01][0-9]|2[0-3])(?:(?P<minsep>:?)(?P<minute>[0-5][0-9]))?
                  | (?P<midnight>24(?P<midsep>:?)00)
                )
                (?:[.,](?P<partial>[0-9]+))?
                (?:(?P<secsep>:?)(?P<second>[0-5][0-9])(?:[.,](?P<fraction>[0-9]+))?)?
                (?P<zone>[zZ]|(?P<sign>[+-])(?P<zonehour>[01][0-9]|2[0-3]):?(?P<zoneminute>[0-5][0-9])?)?
            )?
        )?$",
    )
    .expect("ISO-8601 grammar compiles")
});

/// Parses an ISO-8601 date or date-time into a timestamp.
///
/// Missing components default to the start of their period. Values carrying
/// `Z` or a numeric offset are normalized to UTC; values without one are
/// taken as-is.
pub fn iso8601(s: &str) -> Option<NaiveDateTime> {
    let caps = GRAMMAR.captures(s)?;
    let text = |name: &str| caps.name(name).map(|m| m.as_str());
    let digits = |name: &str| text(name).and_then(|d| d.parse::<u32>().ok());
    let year = caps.name("year")?;
    // basic YYYYMM is ambiguous with YYMMDD and is not ISO-8601
    let rest = s[year.end()..].as_bytes();
    if rest.len() >= 2
        && rest[..2].iter().all(u8::is_ascii_digit)
        && !rest.get(2).is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        return None;
    }
    if text("day").is_some() && text("daysep") != text("datesep") {
        return None;
    }
    let year = year.as_str().parse::<i32>().ok()?;
    let date = match (digits("month"), digits("week"), digits("ordinal")) {
        (Some(month), _, _) => NaiveDate::from_ymd_opt(year, month, digits("day").unwrap_or(1))?,
        (_, Some(week), _) => NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?
            .checked_add_days(Days::new(u64::from(digits("weekday").unwrap_or(1) - 1)))?,
        (_, _, Some(ordinal)) => NaiveDate::from_yo_opt(year, ordinal)?,
        _ => NaiveDate::from_ymd_opt(year, 1, 1)?,
    };
    let midnight = text("midnight").is_some();
    let second = digits("second").unwrap_or(0);
    let separator = text("minsep").or(text("midsep")).unwrap_or("");
    if text("second").is_some()
        && (text("partial").is_some() || text("secsep") != Some(separator))
    {
        return None;
    }
    let (hour, minute) = if midnight {
        (0, 0)
    } else {
        (digits("hour").unwrap_or(0), digits("minute").unwrap_or(0))
    };
    let unit = if text("minute").is_some() || midnight { 60 } else { 3600 };
    let partial = portion(text("partial"), unit)?;
    let fraction = portion(text("fraction"), 1)?;
    if midnight && (second != 0 || !partial.is_zero() || !fraction.is_zero()) {
        return None;
    }
    let offset = match (text("sign"), digits("zonehour")) {
        (Some(sign), Some(h)) => {
            let seconds = i64::from(h * 3600 + digits("zoneminute").unwrap_or(0) * 60);
            TimeDelta::seconds(if sign == "-" { -seconds } else { seconds })
        }
        _ => TimeDelta::zero(),
    };
    let rollover = TimeDelta::days(i64::from(midnight));
    date.and_hms_opt(hour, minute, second)?
        .checked_add_signed(partial)?
        .checked_add_signed(fraction)?
        .checked_add_signed(rollover)?
        .checked_sub_signed(offset)
}

/// A decimal fraction of a unit of the given number of seconds.
fn portion(digits: Option<&str>, seconds: i64) -> Option<TimeDelta> {
    match digits {
        None => Some(TimeDelta::zero()),
        Some(digits) => format!("0.{}", digits)
            .parse::<f64>()
            .ok()
            .map(|f| (f * seconds as f64 * 1e9).round() as i64)
            .map(TimeDelta::nanoseconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "from_town": "Vilnius",
            "airline": "AirBaltic",
            "arrival_time": "2024-01-01T10:00",
            "is_late": 0,
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut body = valid();
        body[key] = value;
        body
    }

    fn failures(body: Value) -> Vec<&'static str> {
        Draft::validate(body)
            .expect_err("should be rejected")
            .iter()
            .map(|v| v.field().name())
            .collect()
    }

    #[test]
    fn accepts_and_normalizes() {
        let draft = Draft::validate(valid()).expect("valid");
        assert_eq!(draft.from_town(), "Vilnius");
        assert_eq!(draft.airline(), "AirBaltic");
        assert_eq!(draft.is_late(), 0);
        assert_eq!(
            draft.arrival_time(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .unwrap()
        );
    }

    #[test]
    fn length_bounds() {
        assert!(Draft::validate(with("from_town", json!("abc"))).is_ok());
        assert!(Draft::validate(with("from_town", json!("a".repeat(64)))).is_ok());
        assert_eq!(failures(with("from_town", json!("ab"))), ["from_town"]);
        assert_eq!(failures(with("from_town", json!("a".repeat(65)))), ["from_town"]);
        assert!(Draft::validate(with("airline", json!("a".repeat(32)))).is_ok());
        assert_eq!(failures(with("airline", json!("a".repeat(33)))), ["airline"]);
        assert_eq!(failures(with("airline", json!("SA"))), ["airline"]);
    }

    #[test]
    fn length_counts_characters() {
        assert!(Draft::validate(with("from_town", json!("Šėš"))).is_ok());
        assert!(Draft::validate(with("airline", json!("ą".repeat(32)))).is_ok());
        assert!(Draft::validate(with("airline", json!("✈\u{FE0F}✈\u{FE0F}✈\u{FE0F}"))).is_ok());
        assert!(Draft::validate(with("airline", json!("✈\u{FE0E}".repeat(32)))).is_ok());
        assert_eq!(failures(with("from_town", json!("ab\u{FE0F}"))), ["from_town"]);
    }

    #[test]
    fn numbers_are_stringified_for_length() {
        let draft = Draft::validate(with("from_town", json!(12345))).expect("valid");
        assert_eq!(draft.from_town(), "12345");
    }

    #[test]
    fn late_flag_is_loose() {
        for ok in [json!(0), json!(1), json!("0"), json!("1"), json!(1.0), json!(true)] {
            assert!(Draft::validate(with("is_late", ok.clone())).is_ok(), "{}", ok);
        }
        for bad in [json!(2), json!(-1), json!("2"), json!("yes"), json!(null), json!(0.5)] {
            assert_eq!(failures(with("is_late", bad.clone())), ["is_late"], "{}", bad);
        }
        let draft = Draft::validate(with("is_late", json!("1"))).expect("valid");
        assert_eq!(draft.is_late(), 1);
    }

    #[test]
    fn reports_every_failure_in_field_order() {
        let body = json!({
            "is_late": 7,
            "arrival_time": "tomorrow",
            "airline": "X",
            "from_town": "",
        });
        assert_eq!(
            failures(body),
            ["from_town", "airline", "arrival_time", "is_late"]
        );
    }

    #[test]
    fn missing_body_fails_everything() {
        assert_eq!(failures(json!(null)).len(), 4);
        assert_eq!(failures(json!([1, 2, 3])).len(), 4);
        assert_eq!(failures(json!({})).len(), 4);
    }

    #[test]
    fn violation_shape() {
        let errors = Draft::validate(with("is_late", json!(5))).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!([{
                "type": "field",
                "value": 5,
                "msg": "'is_late' field must be 0 or 1!",
                "path": "is_late",
                "location": "body",
            }])
        );
        let mut body = valid();
        body.as_object_mut().unwrap().remove("airline");
        let errors = Draft::validate(body).unwrap_err();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!([{
                "type": "field",
                "msg": "'airline' field must be 3-32 characters long!",
                "path": "airline",
                "location": "body",
            }])
        );
    }

    #[test]
    fn echo_preserves_submission() {
        let draft = Draft::validate(with("id", json!(5))).expect("valid");
        assert_eq!(
            draft.echo(42),
            json!({
                "id": 42,
                "from_town": "Vilnius",
                "airline": "AirBaltic",
                "arrival_time": "2024-01-01T10:00",
                "is_late": 0,
            })
        );
    }

    #[test]
    fn iso8601_forms() {
        let at = |y, m, d, h, min, s| {
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|d| d.and_hms_opt(h, min, s))
        };
        assert_eq!(iso8601("2024"), at(2024, 1, 1, 0, 0, 0));
        assert_eq!(iso8601("2024-03"), at(2024, 3, 1, 0, 0, 0));
        assert_eq!(iso8601("2024-03-05"), at(2024, 3, 5, 0, 0, 0));
        assert_eq!(iso8601("2024-03-05 10:30"), at(2024, 3, 5, 10, 30, 0));
        assert_eq!(iso8601("2024-03-05T10:30:15"), at(2024, 3, 5, 10, 30, 15));
        assert_eq!(iso8601("2024-03-05T10:30:15Z"), at(2024, 3, 5, 10, 30, 15));
        assert_eq!(iso8601("2024-03-05T10:30Z"), at(2024, 3, 5, 10, 30, 0));
        assert_eq!(iso8601("2024-03-05T10:30:00+02:00"), at(2024, 3, 5, 8, 30, 0));
        assert_eq!(iso8601("2024-03-05T10:30-0100"), at(2024, 3, 5, 11, 30, 0));
        assert_eq!(
            iso8601("2024-03-05T10:30:15.250").map(|t| t.and_utc().timestamp_subsec_millis()),
            Some(250)
        );
        assert_eq!(
            iso8601("2024-03-05T10:30:15,5").map(|t| t.and_utc().timestamp_subsec_millis()),
            Some(500)
        );
        assert_eq!(iso8601("2024-01-01T10"), at(2024, 1, 1, 10, 0, 0));
        assert_eq!(iso8601("2024-01-01T10,5"), at(2024, 1, 1, 10, 30, 0));
        assert_eq!(iso8601("2024-01-01T10:00,5"), at(2024, 1, 1, 10, 0, 30));
        assert_eq!(iso8601("20240101"), at(2024, 1, 1, 0, 0, 0));
        assert_eq!(iso8601("20240101T1000"), at(2024, 1, 1, 10, 0, 0));
        assert_eq!(iso8601("20240101T103015Z"), at(2024, 1, 1, 10, 30, 15));
        assert_eq!(iso8601("2024-01-01T10:00+02"), at(2024, 1, 1, 8, 0, 0));
        assert_eq!(iso8601("2024-01-01T24:00"), at(2024, 1, 2, 0, 0, 0));
        assert_eq!(iso8601("2024-W01-1"), at(2024, 1, 1, 0, 0, 0));
        assert_eq!(iso8601("2024W017"), at(2024, 1, 7, 0, 0, 0));
        assert_eq!(iso8601("2024-001"), at(2024, 1, 1, 0, 0, 0));
        assert_eq!(iso8601("2024-060"), at(2024, 2, 29, 0, 0, 0));
        assert_eq!(iso8601("+2024-03-05"), at(2024, 3, 5, 0, 0, 0));
    }

    #[test]
    fn iso8601_rejections() {
        for bad in [
            "",
            "tomorrow",
            "05/03/2024",
            " 2024-03-05",
            "202403",
            "2024-0305",
            "2024-13-01",
            "2024-02-30",
            "2023-366",
            "2024-W53-1",
            "2024-03-05T",
            "2024-03-05T25:00",
            "2024-03-05T10:3015",
            "2024-03-05T10,5:00",
            "2024-03-05T24:30",
            "2024-03-05T24:00:01",
            "2024-03-05T10:00+24",
        ] {
            assert_eq!(iso8601(bad), None, "{:?}", bad);
        }
    }
}
