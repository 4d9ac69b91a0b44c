// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Destination key layout for delivered artifacts.
//!
//! Keys are partitioned by calendar day and suffixed with a second-resolution
//! timestamp: `{key_prefix}/{YYYY}/{MM}/{DD}/{file_prefix}_{YYYYMMDDHHMMSS}.csv`.

use chrono::{DateTime, Datelike, Utc};

/// Builds the object key for an export started at `now` (UTC).
pub fn destination_key(key_prefix: &str, file_prefix: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}/{:04}/{:02}/{:02}/{}_{}.csv",
        key_prefix.trim_end_matches('/'),
        now.year(),
        now.month(),
        now.day(),
        file_prefix,
        now.format("%Y%m%d%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_destination_key_layout() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(
            destination_key("dynamo", "TT", now),
            "dynamo/2024/03/07/TT_20240307090502.csv"
        );
    }

    #[test]
    fn test_trailing_slash_in_prefix() {
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            destination_key("exports/daily/", "orders", now),
            "exports/daily/2023/12/31/orders_20231231235959.csv"
        );
    }

    #[test]
    fn test_distinct_seconds_give_distinct_keys() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        assert_ne!(destination_key("d", "TT", a), destination_key("d", "TT", b));
    }
}
