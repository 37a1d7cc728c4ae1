use chrono::{Duration, NaiveDateTime};

use crate::models::{ConfirmationRecord, SESSION_MINUTES};
use crate::services::booking::session_start;

/// iCalendar file for a confirmed session. `None` when the booked date or
/// slot can't be turned into a start time.
pub fn generate_ics(record: &ConfirmationRecord, stamp: NaiveDateTime) -> Option<String> {
    let start = session_start(&record.booking_data)?;
    let dtstart = start.format("%Y%m%dT%H%M%S").to_string();
    let dtend = (start + Duration::minutes(SESSION_MINUTES))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = stamp.format("%Y%m%dT%H%M%S").to_string();
    let uid = format!("{}@hugs", record.transaction_id);

    Some(format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//HUGS//Counseling Booking//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:HUGS video counseling session\r\n\
         DESCRIPTION:Transaction ID: {txn}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
        txn = record.transaction_id,
    ))
}
