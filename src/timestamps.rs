// Best-effort capture time from a photo/video file name. Camera file names are
// written in the camera's local time, so unlike the location history (which is
// UTC) the result is interpreted in the local time zone.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use regex_lite::{Captures, Regex};

lazy_static! {
    static ref DATE_REGEXES: [Regex; 4] = [
        Regex::new(r"(\d{4})(\d{2})(\d{2})").unwrap(),
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap(),
        Regex::new(r"(\d{4})_(\d{2})_(\d{2})").unwrap(),
        Regex::new(r"(\d{4})\.(\d{2})\.(\d{2})").unwrap(),
    ];
    static ref TIME_REGEXES: [Regex; 4] = [
        Regex::new(r"(\d{2})(\d{2})(\d{2})").unwrap(),
        Regex::new(r"(\d{2})-(\d{2})-(\d{2})").unwrap(),
        Regex::new(r"(\d{2})_(\d{2})_(\d{2})").unwrap(),
        Regex::new(r"(\d{2})\.(\d{2})\.(\d{2})").unwrap(),
    ];
}

// A match must not be glued to a letter or digit on either side. `_` and any
// other character count as a separator.
fn is_boundary(c: Option<char>) -> bool {
    c.map_or(true, |c| !c.is_ascii_alphanumeric())
}

/// First match that is properly delimited. Candidates are tried at every
/// start position, so a rejected candidate can't hide a later one overlapping
/// it.
fn find_delimited<'h>(regex: &Regex, haystack: &'h str) -> Option<Captures<'h>> {
    let mut start = 0;
    while start <= haystack.len() {
        let captures = regex.captures_at(haystack, start)?;
        let m = captures.get(0)?;
        let before = haystack[..m.start()].chars().next_back();
        let after = haystack[m.end()..].chars().next();
        if is_boundary(before) && is_boundary(after) {
            return Some(captures);
        }
        // every pattern starts with an ASCII digit
        start = m.start() + 1;
    }
    None
}

fn first_match<'h>(regexes: &[Regex], haystack: &'h str) -> Option<(Captures<'h>, [u32; 3])> {
    regexes.iter().find_map(|regex| {
        let captures = find_delimited(regex, haystack)?;
        let mut values = [0; 3];
        for (i, value) in values.iter_mut().enumerate() {
            *value = captures.get(i + 1)?.as_str().parse().ok()?;
        }
        Some((captures, values))
    })
}

/// Extracts a timestamp from a file name like `IMG_20230615_143022.jpg`.
///
/// The date is mandatory and must look sane (year >= 1970, month <= 12,
/// day <= 31), otherwise `None`. The time (`HHMMSS`, optionally separated by
/// `-`, `_` or `.`) is looked for in what is left after removing the date, and
/// falls back to midnight if missing or out of range.
pub fn extract_timestamp(filename: &str) -> Option<DateTime<Local>> {
    let (date_match, [year, month, day]) = first_match(&*DATE_REGEXES, filename)?;
    if year < 1970 || month > 12 || day > 31 {
        // false positive
        return None;
    }
    let date_range = date_match.get(0)?.range();
    let rest = format!("{}{}", &filename[..date_range.start], &filename[date_range.end..]);

    let [mut hours, mut minutes, mut seconds] = first_match(&*TIME_REGEXES, &rest)
        .map(|(_, values)| values)
        .unwrap_or_default();
    if hours > 23 || minutes > 59 || seconds > 59 {
        hours = 0;
        minutes = 0;
        seconds = 0;
    }

    let naive = lenient_date(year as i32, month, day)?.and_hms_opt(hours, minutes, seconds)?;
    to_local(naive)
}

/// Calendar arithmetic instead of validation: `02-31` is March 3rd (or 2nd in
/// a leap year), day `00` is the last day of the previous month and month `00`
/// is December of the previous year.
fn lenient_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let (year, month) = if month == 0 {
        (year - 1, 12)
    } else {
        (year, month)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_signed(TimeDelta::days(i64::from(day) - 1))
}

fn to_local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    resolve_local(&Local, naive)
}

/// Wall clock time to an instant in `tz`. An ambiguous time takes the earlier
/// instant; a time skipped by a DST change moves forward one hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(x) => Some(x),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // e.g. 02:30 on a spring-forward night
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Paris;

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn extract(filename: &str) -> Option<NaiveDateTime> {
        extract_timestamp(filename).map(|x| x.naive_local())
    }

    #[test]
    fn common_camera_names() {
        assert_eq!(
            extract("IMG_20230615_143022.jpg"),
            Some(naive("2023-06-15 14:30:22"))
        );
        assert_eq!(
            extract("PXL_20240102_081500123.jpg"),
            Some(naive("2024-01-02 00:00:00"))
        );
        assert_eq!(
            extract("Screenshot_2021-12-24-18-05-59.png"),
            Some(naive("2021-12-24 18:05:59"))
        );
        assert_eq!(
            extract("WhatsApp Image 2022_03_04 at 10.11.12.jpeg"),
            Some(naive("2022-03-04 10:11:12"))
        );
        assert_eq!(
            extract("2019.07.08 23_59_59.heic"),
            Some(naive("2019-07-08 23:59:59"))
        );
    }

    #[test]
    fn no_date() {
        assert_eq!(extract("photo.jpg"), None);
        assert_eq!(extract(""), None);
        // glued to letters, not a date
        assert_eq!(extract("IMG20230615.jpg"), None);
        // too many digits
        assert_eq!(extract("IMG_202306151.jpg"), None);
    }

    #[test]
    fn implausible_date() {
        assert_eq!(extract("IMG_19691231_120000.jpg"), None);
        assert_eq!(extract("IMG_20231301_120000.jpg"), None);
        assert_eq!(extract("IMG_20230632_120000.jpg"), None);
    }

    #[test]
    fn first_date_pattern_wins() {
        // `YYYYMMDD` is tried before `YYYY-MM-DD` even though the latter
        // comes first in the name
        assert_eq!(
            extract("2020-01-02_20210304.jpg"),
            Some(naive("2021-03-04 00:00:00"))
        );
    }

    #[test]
    fn invalid_time_falls_back_to_midnight() {
        assert_eq!(
            extract("VID_20230615_999999.mp4"),
            Some(naive("2023-06-15 00:00:00"))
        );
        assert_eq!(
            extract("VID_20230615_126000.mp4"),
            Some(naive("2023-06-15 00:00:00"))
        );
    }

    #[test]
    fn missing_time_is_midnight() {
        assert_eq!(extract("2023-06-15.jpg"), Some(naive("2023-06-15 00:00:00")));
        // only hours and minutes is not a time
        assert_eq!(
            extract("2023-06-15 14-30.jpg"),
            Some(naive("2023-06-15 00:00:00"))
        );
    }

    #[test]
    fn overlapping_candidates() {
        // `10-11-12` is glued to the `a`, the next candidate overlaps it
        assert_eq!(
            extract("2023-06-15_a10-11-12-13.jpg"),
            Some(naive("2023-06-15 11:12:13"))
        );
    }

    #[test]
    fn lenient_calendar() {
        assert_eq!(
            extract("IMG_20230231.jpg"),
            Some(naive("2023-03-03 00:00:00"))
        );
        assert_eq!(
            extract("IMG_20240231.jpg"),
            Some(naive("2024-03-02 00:00:00"))
        );
        assert_eq!(
            extract("IMG_20230300.jpg"),
            Some(naive("2023-02-28 00:00:00"))
        );
        assert_eq!(
            extract("IMG_20230015.jpg"),
            Some(naive("2022-12-15 00:00:00"))
        );
    }

    #[test]
    fn dst_gap_moves_forward() {
        let resolved = resolve_local(&Paris, naive("2024-03-31 02:30:00")).unwrap();
        assert_eq!(resolved.naive_local(), naive("2024-03-31 03:30:00"));
        assert_eq!(resolved.naive_utc(), naive("2024-03-31 01:30:00"));
    }

    #[test]
    fn dst_overlap_takes_earlier() {
        let resolved = resolve_local(&Paris, naive("2024-10-27 02:30:00")).unwrap();
        assert_eq!(resolved.naive_local(), naive("2024-10-27 02:30:00"));
        assert_eq!(resolved.naive_utc(), naive("2024-10-27 00:30:00"));
    }

    #[test]
    fn unambiguous_time() {
        let resolved = resolve_local(&Paris, naive("2024-06-15 14:30:22")).unwrap();
        assert_eq!(resolved.naive_utc(), naive("2024-06-15 12:30:22"));
    }
}
