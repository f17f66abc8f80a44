use chrono::{DateTime, Utc};

pub fn datetime_to_string(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn datetime_to_string_opt(datetime: Option<DateTime<Utc>>) -> Option<String> {
    datetime.map(datetime_to_string)
}
