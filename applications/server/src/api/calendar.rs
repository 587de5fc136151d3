/// iCalendar feed for a band's upcoming rehearsals
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use bandmate_core::{Band, BandId, Rehearsal, RehearsalStatus};
use bandmate_storage::{bands, rehearsals};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

/// A rehearsal books a fixed two-hour block
const REHEARSAL_BLOCK_HOURS: i64 = 2;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    #[serde(rename = "bandId", default)]
    pub band_id: String,
}

/// GET /api/calendar?bandId=...
///
/// Public feed; the band ID in the query string is the only credential.
/// Renders today's and future rehearsals, ascending.
pub async fn calendar_feed(
    State(app_state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response> {
    let band_id = query.band_id.trim();
    if band_id.is_empty() {
        return Err(ServerError::BadRequest("Missing bandId".to_string()));
    }

    let band = bands::get_by_id(&app_state.pool, &BandId::new(band_id))
        .await?
        .ok_or_else(|| ServerError::NotFound("Band not found".to_string()))?;

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let upcoming = rehearsals::list_upcoming(&app_state.pool, &band.id, &today).await?;

    let ics = render_calendar(&band, &upcoming);
    let filename = format!("{}.ics", sanitize_filename(&band.name));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/calendar; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .body(Body::from(ics))
        .map_err(|e| ServerError::Internal(format!("Failed to build calendar response: {}", e)))
}

/// Render a complete VCALENDAR document with CRLF line endings
fn render_calendar(band: &Band, rehearsals: &[Rehearsal]) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Bandmate//Rehearsal Calendar//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{} - Rehearsals", escape_text(&band.name)),
        "X-WR-TIMEZONE:UTC".to_string(),
    ];

    for rehearsal in rehearsals {
        render_event(&mut lines, band, rehearsal);
    }

    lines.push("END:VCALENDAR".to_string());

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

fn render_event(lines: &mut Vec<String>, band: &Band, rehearsal: &Rehearsal) {
    // Rows whose date no longer parses cannot be placed on a calendar
    let Some(window) = event_window(rehearsal) else {
        return;
    };

    lines.push("BEGIN:VEVENT".to_string());
    lines.push(format!("UID:{}@bandmate", rehearsal.id));
    lines.push(format!("DTSTAMP:{}", Utc::now().format("%Y%m%dT%H%M%SZ")));

    match window {
        EventWindow::Timed { start, end } => {
            lines.push(format!("DTSTART:{}", start.format("%Y%m%dT%H%M%SZ")));
            lines.push(format!("DTEND:{}", end.format("%Y%m%dT%H%M%SZ")));
        }
        EventWindow::AllDay { date } => {
            lines.push(format!("DTSTART;VALUE=DATE:{}", date.format("%Y%m%d")));
            lines.push(format!(
                "DTEND;VALUE=DATE:{}",
                (date + Duration::days(1)).format("%Y%m%d")
            ));
        }
    }

    lines.push(format!("SUMMARY:{} Rehearsal", escape_text(&band.name)));

    if let Some(location) = rehearsal.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!("LOCATION:{}", escape_text(location)));
    }
    if let Some(description) = rehearsal.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
    }

    let status = if rehearsal.status == RehearsalStatus::Completed {
        "CONFIRMED"
    } else {
        "TENTATIVE"
    };
    lines.push(format!("STATUS:{}", status));
    lines.push("END:VEVENT".to_string());
}

enum EventWindow {
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    AllDay {
        date: NaiveDate,
    },
}

fn event_window(rehearsal: &Rehearsal) -> Option<EventWindow> {
    let date = NaiveDate::parse_from_str(&rehearsal.date, "%Y-%m-%d").ok()?;

    let Some(time_str) = rehearsal.start_time.as_deref().filter(|t| !t.is_empty()) else {
        return Some(EventWindow::AllDay { date });
    };

    match NaiveTime::parse_from_str(time_str, "%H:%M") {
        Ok(time) => {
            let start = date.and_time(time);
            Some(EventWindow::Timed {
                start,
                end: start + Duration::hours(REHEARSAL_BLOCK_HOURS),
            })
        }
        Err(_) => Some(EventWindow::AllDay { date }),
    }
}

/// Escape a value for an RFC 5545 TEXT property
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Download filename: every non-alphanumeric character becomes `_`
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
