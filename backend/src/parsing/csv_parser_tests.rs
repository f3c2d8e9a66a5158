#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use chrono_tz::America::Santiago;

    use crate::parsing::csv_parser::{
        parse_flag, parse_forecast_csv, parse_numeric, parse_timestamp, ParseError,
    };

    const HEADER: &str = "timestamp,tmin,tmean,tmax,tpmin,tprophet,tpmax,trend-weekly,sunset,sunrise";

    fn table(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn test_parse_basic_table() {
        let raw = table(&[
            "2025-08-05T17:45:00-04:00,4.12,5.0,6.0,4.5,5.5,6.5,5.2,false,false",
            "2025-08-05T18:00:00-04:00,3.9,4.8,5.7,4.1,5.1,6.1,5.0,true,false",
        ]);
        let parsed = parse_forecast_csv(&raw, Santiago).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.is_clean());

        let first = &parsed.rows[0];
        assert_eq!(first.tmin, Some(4.1));
        assert_eq!(first.tmean, Some(5.0));
        assert_eq!(first.tprophet, Some(5.5));
        assert_eq!(first.trend_weekly, Some(5.2));
        assert!(!first.is_sunset);

        let second = &parsed.rows[1];
        assert!(second.is_sunset);
        assert_eq!(
            second.instant(),
            Some(Utc.with_ymd_and_hms(2025, 8, 5, 22, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            parse_forecast_csv("", Santiago),
            Err(ParseError::EmptyInput)
        ));
        assert!(matches!(
            parse_forecast_csv("  \n\t\n ", Santiago),
            Err(ParseError::EmptyInput)
        ));
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let parsed = parse_forecast_csv(HEADER, Santiago).unwrap();
        assert!(parsed.rows.is_empty());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_columns_resolved_by_name() {
        let raw = "sunset,tpmax,tprophet,tpmin,trend-weekly,tmax,tmean,tmin,timestamp\n\
                   TRUE,7.0,6.0,5.0,4.0,3.0,2.0,1.0,2025-08-05T18:00:00-04:00\n";
        let parsed = parse_forecast_csv(raw, Santiago).unwrap();
        let row = &parsed.rows[0];

        assert_eq!(row.tmin, Some(1.0));
        assert_eq!(row.tmean, Some(2.0));
        assert_eq!(row.tmax, Some(3.0));
        assert_eq!(row.trend_weekly, Some(4.0));
        assert_eq!(row.tpmin, Some(5.0));
        assert_eq!(row.tprophet, Some(6.0));
        assert_eq!(row.tpmax, Some(7.0));
        assert!(row.is_sunset);
        assert!(row.timestamp.is_some());
    }

    #[test]
    fn test_row_with_wrong_column_count_is_skipped() {
        let raw = table(&[
            "2025-08-05T17:00:00-04:00,1.0,2.0,3.0,1.5,2.5,3.5,2.0,false,false",
            "2025-08-05T17:15:00-04:00,1.0,2.0",
            "2025-08-05T17:30:00-04:00,4.0,5.0,6.0,4.5,5.5,6.5,5.0,false,false,extra",
            "2025-08-05T17:45:00-04:00,7.0,8.0,9.0,7.5,8.5,9.5,8.0,false,false",
        ]);
        let parsed = parse_forecast_csv(&raw, Santiago).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].tmin, Some(1.0));
        assert_eq!(parsed.rows[1].tmin, Some(7.0));

        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].line, 3);
        assert_eq!(parsed.skipped[0].expected_columns, 10);
        assert_eq!(parsed.skipped[0].found_columns, 3);
        assert_eq!(parsed.skipped[1].line, 4);
        assert_eq!(parsed.skipped[1].found_columns, 11);
    }

    #[test]
    fn test_unparsable_numbers_become_none_and_row_is_kept() {
        let raw = table(&[
            "2025-08-05T17:00:00-04:00,abc,,NaN,inf,2.5,-inf,n/a,false,false",
        ]);
        let parsed = parse_forecast_csv(&raw, Santiago).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.tmin, None);
        assert_eq!(row.tmean, None);
        assert_eq!(row.tmax, None);
        assert_eq!(row.tpmin, None);
        assert_eq!(row.tprophet, Some(2.5));
        assert_eq!(row.tpmax, None);
        assert_eq!(row.trend_weekly, None);
    }

    #[test]
    fn test_missing_sunrise_column_defaults_to_false() {
        let raw = "timestamp,tmin,tmean,tmax,tpmin,tprophet,tpmax,trend-weekly,sunset\n\
                   2025-08-05T07:00:00-04:00,1,2,3,1,2,3,2,false\n\
                   2025-08-05T18:00:00-04:00,1,2,3,1,2,3,2,true\n";
        let parsed = parse_forecast_csv(raw, Santiago).unwrap();

        assert!(parsed.missing_columns.is_empty());
        assert!(parsed.rows.iter().all(|r| !r.is_sunrise));
        assert!(parsed.rows[1].is_sunset);
    }

    #[test]
    fn test_missing_required_column_is_reported() {
        let raw = "timestamp,tmin,tmax,sunset\n2025-08-05T18:00:00-04:00,1.0,3.0,true\n";
        let parsed = parse_forecast_csv(raw, Santiago).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].tmean, None);
        assert_eq!(parsed.rows[0].tmin, Some(1.0));
        assert!(parsed.missing_columns.contains(&"tmean".to_string()));
        assert!(parsed.missing_columns.contains(&"trend-weekly".to_string()));
        assert!(!parsed.missing_columns.contains(&"sunset".to_string()));
    }

    #[test]
    fn test_invalid_timestamp_keeps_row() {
        let raw = table(&[
            "not-a-date,1.0,2.0,3.0,1.5,2.5,3.5,2.0,false,false",
            "2025-08-05T18:00:00-04:00,1.0,2.0,3.0,1.5,2.5,3.5,2.0,true,false",
        ]);
        let parsed = parse_forecast_csv(&raw, Santiago).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.rows[0].timestamp.is_none());
        assert_eq!(parsed.rows[0].tmin, Some(1.0));
        assert!(parsed.rows[1].timestamp.is_some());
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let raw = format!(
            "{}\n\n2025-08-05T17:00:00-04:00,1,2,3,1,2,3,2,false,false\n   \n\n2025-08-05T17:15:00-04:00,1,2,3,1,2,3,2,false,false\n\n",
            HEADER
        );
        let parsed = parse_forecast_csv(&raw, Santiago).unwrap();

        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_numeric_rounds_to_one_decimal() {
        assert_eq!(parse_numeric("4.16"), Some(4.2));
        assert_eq!(parse_numeric(" -2.34 "), Some(-2.3));
        assert_eq!(parse_numeric("10"), Some(10.0));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("nan"), None);
        // Finite, but overflows when scaled for rounding
        assert_eq!(parse_numeric("1.7e308"), None);
        assert_eq!(parse_numeric("-1.7e308"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("True"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 8, 5, 22, 0, 0).unwrap();

        let rfc = parse_timestamp("2025-08-05T18:00:00-04:00", Santiago).unwrap();
        assert_eq!(rfc, expected);
        assert_eq!(rfc.offset().local_minus_utc(), -4 * 3600);

        let spaced = parse_timestamp("2025-08-05 22:00:00+00:00", Santiago).unwrap();
        assert_eq!(spaced, expected);

        // Naive timestamps are read in the observation timezone (UTC-4 in August)
        let naive = parse_timestamp("2025-08-05 18:00:00", Santiago).unwrap();
        assert_eq!(naive, expected);

        assert!(parse_timestamp("05/08/2025 18:00", Santiago).is_none());
        assert!(parse_timestamp("", Santiago).is_none());
    }
}
